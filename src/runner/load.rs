//! Configuration load
//!
//! Turns a parsed [`Config`] into a fresh [`Context`]: synthetic variables
//! first, then main variables, then user variables in declaration order
//! (each resolved against the store built so far), then tasks with their
//! subtasks materialized and capability names resolved, then auto-tasks.

use crate::config::types::{Config, SubtaskSource};
use crate::config::{parse_config_file, validate_config};
use crate::error::Result;
use crate::runner::context::Context;
use crate::runner::expand::expand_subtasks;
use crate::runner::registry::Registry;
use crate::runner::resolve::Resolver;
use crate::runner::task::{AutoTask, SubtaskRef, Task};
use crate::ui;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Build a context from a configuration file
pub fn load_context(config_path: &Path, registry: &Registry) -> Result<Context> {
    let config = parse_config_file(config_path)?;
    validate_config(&config)?;

    let mut ctx = Context::new().with_config_path(config_path.to_path_buf());
    populate_context(&mut ctx, &config, registry);
    Ok(ctx)
}

/// Re-read the backing configuration file into an existing context.
///
/// The variable store, tasks, auto-tasks and scripted-answer buffer are all
/// rebuilt; collaborator handles are kept.
pub fn reload_context(ctx: &mut Context, registry: &Registry) -> Result<()> {
    let Some(config_path) = ctx.config_path.clone() else {
        return Ok(());
    };
    let config = parse_config_file(&config_path)?;
    validate_config(&config)?;

    ctx.vars.clear();
    ctx.tasks.clear();
    ctx.autotasks.clear();
    ctx.console.clear_answers();
    populate_context(ctx, &config, registry);
    Ok(())
}

/// Fill an empty context from a parsed configuration.
///
/// Also the entry point for tests that build configs in memory.
pub fn populate_context(ctx: &mut Context, config: &Config, registry: &Registry) {
    load_main_variables(ctx, config);
    load_variables(ctx, config);
    load_tasks(ctx, config, registry);
    load_autotasks(ctx, config);
}

fn resolve_all(ctx: &Context, template: &str) -> Vec<String> {
    Resolver::new(&ctx.vars, ctx.globs.as_ref()).resolve(template)
}

fn resolve_first(ctx: &Context, template: &str) -> String {
    resolve_all(ctx, template)
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn load_main_variables(ctx: &mut Context, config: &Config) {
    let working_dir = ctx.working_dir.to_string_lossy().into_owned();
    ctx.vars.set("CURRENT_PATH", working_dir);

    if let Some(template) = &config.project_file_name {
        let value = resolve_first(ctx, template);
        ctx.vars.set("ProjectFileName", value);
    }

    let mut project_file: Option<PathBuf> = None;
    if let Some(template) = &config.project_file_path {
        let value = resolve_first(ctx, template);
        ctx.vars.set("ProjectFilePath", value.clone());
        project_file = Some(PathBuf::from(value));
    }

    // Engine discovery happens between the project path and the configured
    // engine path, so the latter may reference ${ENGINE_PATH}
    let located = ctx.locator.locate(project_file.as_deref());
    if let Some(engine_path) = located {
        ctx.vars
            .set("ENGINE_PATH", engine_path.to_string_lossy().into_owned());
    }

    if let Some(template) = &config.engine_path {
        let value = resolve_first(ctx, template);
        ctx.vars.set("EnginePath", value);
    }
}

fn load_variables(ctx: &mut Context, config: &Config) {
    for (key, value) in &config.variables {
        let Some(name) = key.as_str() else {
            ui::warn(&format!("Ignoring non-string variable name: {:?}", key));
            continue;
        };

        match value {
            serde_yaml::Value::String(template) => {
                let values = resolve_all(ctx, template);
                ctx.vars.extend(name, values);
            }
            serde_yaml::Value::Sequence(items) => {
                let mut values = Vec::new();
                for item in items {
                    match item.as_str() {
                        Some(template) => values.extend(resolve_all(ctx, template)),
                        None => ui::warn(&format!(
                            "Ignoring non-string value in variable '{}'",
                            name
                        )),
                    }
                }
                ctx.vars.extend(name, values);
            }
            other => {
                ui::warn(&format!(
                    "Ignoring variable '{}' with unsupported value: {:?}",
                    name, other
                ));
            }
        }
    }
}

fn load_tasks(ctx: &mut Context, config: &Config, registry: &Registry) {
    let mut tasks = Vec::with_capacity(config.tasks.len());

    for def in &config.tasks {
        let title = resolve_first(ctx, &def.title);
        let subtasks = materialize_subtasks(ctx, &def.subtasks, registry);

        let filters = def
            .filters
            .iter()
            .filter_map(|name| {
                let filter = registry.filter(name);
                if filter.is_none() {
                    ui::warn(&format!("Unknown filter '{}' in task '{}'", name, title));
                }
                filter
            })
            .collect();

        let action = def.action.as_ref().and_then(|name| {
            let action = registry.action(name);
            if action.is_none() {
                ui::warn(&format!("Unknown action '{}' in task '{}'", name, title));
            }
            action
        });

        let pre_action = def.pre_action.as_ref().and_then(|name| {
            let pre = registry.pre_action(name);
            if pre.is_none() {
                ui::warn(&format!("Unknown pre-action '{}' in task '{}'", name, title));
            }
            pre
        });

        let post_action = def.post_action.as_ref().and_then(|name| {
            let post = registry.post_action(name);
            if post.is_none() {
                ui::warn(&format!("Unknown post-action '{}' in task '{}'", name, title));
            }
            post
        });

        tasks.push(Rc::new(Task {
            id: def.id.clone(),
            title,
            subtasks,
            filters,
            action,
            pre_action,
            post_action,
        }));
    }

    ctx.tasks = tasks;
}

fn materialize_subtasks(
    ctx: &Context,
    source: &SubtaskSource,
    registry: &Registry,
) -> Vec<SubtaskRef> {
    match source {
        SubtaskSource::Inline(defs) => {
            let resolver = Resolver::new(&ctx.vars, ctx.globs.as_ref());
            let mut result = Vec::new();
            for def in defs {
                result.extend(expand_subtasks(&resolver, &def.msg, &def.program, &def.args));
            }
            result
        }
        SubtaskSource::Provider(name) => match registry.provider(name) {
            Some(provider) => provider.subtasks(&ctx.vars),
            None => {
                ui::warn(&format!("Unknown subtask provider '{}'", name));
                Vec::new()
            }
        },
    }
}

fn load_autotasks(ctx: &mut Context, config: &Config) {
    ctx.autotasks = config
        .auto_tasks
        .iter()
        .map(|def| AutoTask {
            id: def.id.clone(),
            title: def.title.clone(),
            step_descriptions: def.step_descriptions.clone(),
            steps: def.steps.clone(),
        })
        .collect();
}
