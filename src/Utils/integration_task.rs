//! Task files: a list of integrals to solve plus run settings.
//!
//! ```text
//! integral1
//!   expression: "exp(-x^2)"
//!   variable: x
//!   lower: -inf
//!   upper: inf
//!   tolerance: 1e-4
//!   method: auto
//! settings
//!   loglevel: info
//!   max_depth: 50
//!   parallel: true
//!   logfile: false
//! ```
//! Every section whose title starts with `integral` is one task. Without `lower` and
//! `upper` the task is an indefinite integral, and `tolerance`, `method` or `max_depth`
//! on it is an error. A key may appear once per section. Missing keys take the defaults
//! `variable: x`, `tolerance: 1e-6`, `method: auto`; the `settings` section is optional.
//!
//! Tasks are independent, so `run_tasks` may solve them on the rayon thread pool; the
//! reports come back in document order either way.
use crate::Utils::logger::parse_level;
use crate::Utils::task_parser::{Section, Value, parse_task_document};
use crate::errors::IntegrationError;
use crate::numerical::adaptive_simpson::DEFAULT_MAX_DEPTH;
use crate::numerical::definite_integral::{
    DEFAULT_TOLERANCE, IntegrationMethod, IntegrationRequest, IntegrationResult, Integrator,
    integrate_indefinite,
};
use crate::numerical::improper::Bound;
use crate::symbolic::integration_strategies::Antiderivative;
use log::{info, warn};
use rayon::prelude::*;
use simplelog::LevelFilter;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const TASK_KEYS: [&str; 7] = [
    "expression",
    "variable",
    "lower",
    "upper",
    "tolerance",
    "method",
    "max_depth",
];
/// keys that only make sense for a definite integral
const DEFINITE_ONLY_KEYS: [&str; 3] = ["tolerance", "method", "max_depth"];
const SETTINGS_KEYS: [&str; 4] = ["loglevel", "max_depth", "parallel", "logfile"];

#[derive(Debug, Clone, PartialEq)]
pub struct TaskSettings {
    pub loglevel: LevelFilter,
    pub max_depth: usize,
    pub parallel: bool,
    pub logfile: bool,
}

impl Default for TaskSettings {
    fn default() -> Self {
        TaskSettings {
            loglevel: LevelFilter::Info,
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: true,
            logfile: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    Definite(IntegrationRequest),
    Indefinite { expression: String, variable: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationTask {
    pub name: String,
    pub kind: TaskKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskFile {
    pub tasks: Vec<IntegrationTask>,
    pub settings: TaskSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Definite(IntegrationResult),
    Indefinite(Antiderivative),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub name: String,
    pub expression: String,
    pub outcome: Result<TaskOutcome, IntegrationError>,
}

fn task_error(section: &str, message: impl std::fmt::Display) -> IntegrationError {
    IntegrationError::Task(format!("section '{}': {}", section, message))
}

fn check_keys(section: &Section, allowed: &[&str]) -> Result<(), IntegrationError> {
    let mut keys: Vec<&String> = section.entries.keys().collect();
    keys.sort();
    for key in keys {
        if !allowed.contains(&key.as_str()) {
            return Err(task_error(&section.title, format!("unknown key '{}'", key)));
        }
    }
    Ok(())
}

/// value of a single-valued key
fn single<'a>(section: &'a Section, key: &str) -> Result<Option<&'a Value>, IntegrationError> {
    match section.entries.get(key).map(|values| values.as_slice()) {
        None => Ok(None),
        Some([value]) => Ok(Some(value)),
        Some([]) => Err(task_error(&section.title, format!("'{}' has no value", key))),
        Some(_) => Err(task_error(
            &section.title,
            format!("'{}' takes a single value", key),
        )),
    }
}

fn bound_from_value(section: &Section, value: &Value) -> Result<Bound, IntegrationError> {
    match value {
        Value::Float(val) => Ok(Bound::from(*val)),
        Value::Integer(val) => Ok(Bound::Finite(*val as f64)),
        Value::String(text) => Bound::from_str(text),
        Value::Boolean(_) => Err(task_error(&section.title, format!("'{}' is not a bound", value))),
    }
}

fn positive_integer(section: &Section, key: &str, value: &Value) -> Result<usize, IntegrationError> {
    match value.as_integer() {
        Some(n) if n >= 1 => Ok(n as usize),
        _ => Err(task_error(
            &section.title,
            format!("'{}' must be a positive integer, got '{}'", key, value),
        )),
    }
}

fn boolean(section: &Section, key: &str, value: &Value) -> Result<bool, IntegrationError> {
    value.as_boolean().ok_or_else(|| {
        task_error(
            &section.title,
            format!("'{}' must be true or false, got '{}'", key, value),
        )
    })
}

/// a task and whether it names its own max_depth
fn task_from_section(section: &Section) -> Result<(IntegrationTask, bool), IntegrationError> {
    check_keys(section, &TASK_KEYS)?;
    let expression = single(section, "expression")?
        .map(|value| value.to_string_value())
        .ok_or_else(|| task_error(&section.title, "no expression"))?;
    let variable = match single(section, "variable")? {
        Some(value) => value.to_string_value(),
        None => "x".to_string(),
    };
    let lower = single(section, "lower")?;
    let upper = single(section, "upper")?;
    let kind = match (lower, upper) {
        (None, None) => {
            if let Some(key) = DEFINITE_ONLY_KEYS
                .iter()
                .find(|key| section.entries.contains_key(**key))
            {
                return Err(task_error(
                    &section.title,
                    format!(
                        "'{}' needs 'lower' and 'upper'; without bounds the integral is indefinite",
                        key
                    ),
                ));
            }
            TaskKind::Indefinite {
                expression,
                variable,
            }
        }
        (Some(lower), Some(upper)) => {
            let lower = bound_from_value(section, lower)?;
            let upper = bound_from_value(section, upper)?;
            let tolerance = match single(section, "tolerance")? {
                Some(value) => value.as_float().ok_or_else(|| {
                    task_error(&section.title, format!("tolerance '{}' is not a number", value))
                })?,
                None => DEFAULT_TOLERANCE,
            };
            let method = match single(section, "method")? {
                Some(value) => IntegrationMethod::from_str(&value.to_string_value()).map_err(|_| {
                    task_error(&section.title, format!("unknown method '{}'", value))
                })?,
                None => IntegrationMethod::Auto,
            };
            let mut request = IntegrationRequest::new(&expression, &variable, lower, upper)
                .with_tolerance(tolerance)
                .with_method(method);
            if let Some(value) = single(section, "max_depth")? {
                request = request.with_max_depth(positive_integer(section, "max_depth", value)?);
            }
            TaskKind::Definite(request)
        }
        _ => {
            return Err(task_error(
                &section.title,
                "a definite integral needs both 'lower' and 'upper'",
            ));
        }
    };
    let own_depth = section.entries.contains_key("max_depth");
    Ok((
        IntegrationTask {
            name: section.title.clone(),
            kind,
        },
        own_depth,
    ))
}

fn settings_from_section(section: &Section) -> Result<TaskSettings, IntegrationError> {
    check_keys(section, &SETTINGS_KEYS)?;
    let mut settings = TaskSettings::default();
    if let Some(value) = single(section, "loglevel")? {
        settings.loglevel = parse_level(&value.to_string_value()).ok_or_else(|| {
            task_error(
                &section.title,
                format!("loglevel must be debug, info, warn, error or off, got '{}'", value),
            )
        })?;
    }
    if let Some(value) = single(section, "max_depth")? {
        settings.max_depth = positive_integer(section, "max_depth", value)?;
    }
    if let Some(value) = single(section, "parallel")? {
        settings.parallel = boolean(section, "parallel", value)?;
    }
    if let Some(value) = single(section, "logfile")? {
        settings.logfile = boolean(section, "logfile", value)?;
    }
    Ok(settings)
}

/// Builds the task list from the text of a task file.
pub fn parse_task_text(text: &str) -> Result<TaskFile, IntegrationError> {
    let sections = parse_task_document(text).map_err(IntegrationError::Task)?;
    let mut settings: Option<TaskSettings> = None;
    let mut tasks = Vec::new();
    let mut seen = HashSet::new();
    for section in &sections {
        if !seen.insert(section.title.as_str()) {
            return Err(task_error(&section.title, "appears twice"));
        }
        if section.title == "settings" {
            settings = Some(settings_from_section(section)?);
        } else if section.title.starts_with("integral") {
            tasks.push(task_from_section(section)?);
        } else {
            return Err(task_error(
                &section.title,
                "unknown section, expected 'integral…' or 'settings'",
            ));
        }
    }
    if tasks.is_empty() {
        return Err(IntegrationError::Task("no integral sections".to_string()));
    }
    let settings = settings.unwrap_or_default();
    let tasks = tasks
        .into_iter()
        .map(|(mut task, own_depth)| {
            if let TaskKind::Definite(request) = &mut task.kind {
                if !own_depth {
                    request.max_depth = settings.max_depth;
                }
            }
            task
        })
        .collect();
    Ok(TaskFile { tasks, settings })
}

pub fn load_task_file(path: &Path) -> Result<TaskFile, IntegrationError> {
    let text = fs::read_to_string(path).map_err(|e| {
        IntegrationError::Task(format!("cannot read {}: {}", path.display(), e))
    })?;
    info!("task file {} loaded", path.display());
    parse_task_text(&text)
}

impl IntegrationTask {
    pub fn expression(&self) -> &str {
        match &self.kind {
            TaskKind::Definite(request) => &request.expression,
            TaskKind::Indefinite { expression, .. } => expression,
        }
    }

    pub fn run(&self, integrator: &Integrator) -> TaskReport {
        let outcome = match &self.kind {
            TaskKind::Definite(request) => integrator.solve(request).map(TaskOutcome::Definite),
            TaskKind::Indefinite {
                expression,
                variable,
            } => integrate_indefinite(expression, variable).map(TaskOutcome::Indefinite),
        };
        if let Err(e) = &outcome {
            warn!("task {} failed: {}", self.name, e);
        }
        TaskReport {
            name: self.name.clone(),
            expression: self.expression().to_string(),
            outcome,
        }
    }
}

/// Solves every task; the reports keep the order of `tasks`.
pub fn run_tasks(tasks: &[IntegrationTask], parallel: bool) -> Vec<TaskReport> {
    let integrator = Integrator::new();
    if parallel {
        tasks.par_iter().map(|task| task.run(&integrator)).collect()
    } else {
        tasks.iter().map(|task| task.run(&integrator)).collect()
    }
}

fn definite(name: &str, expression: &str, lower: Bound, upper: Bound) -> IntegrationTask {
    IntegrationTask {
        name: name.to_string(),
        kind: TaskKind::Definite(IntegrationRequest::new(expression, "x", lower, upper)),
    }
}

fn indefinite(name: &str, expression: &str) -> IntegrationTask {
    IntegrationTask {
        name: name.to_string(),
        kind: TaskKind::Indefinite {
            expression: expression.to_string(),
            variable: "x".to_string(),
        },
    }
}

/// The example list solved when the runner gets no task file.
pub fn builtin_examples() -> Vec<IntegrationTask> {
    use Bound::{Finite, NegInfinity, PosInfinity};
    vec![
        indefinite("example1", "x^2"),
        indefinite("example2", "sin(x)"),
        definite("example3", "3*x^2 + 2*x", Finite(0.0), Finite(1.0)),
        definite("example4", "e^x", Finite(0.0), Finite(2.0)),
        definite("example5", "1/x", Finite(1.0), Finite(2.0)),
        definite("example6", "cos(x)", Finite(0.0), Finite(std::f64::consts::PI)),
        definite("example7", "sqrt(1 - x^2)", Finite(0.0), Finite(1.0)),
        definite("example8", "exp(-x^2)", NegInfinity, PosInfinity),
        definite("example9", "log(x)", Finite(1.0), Finite(10.0)),
        definite("example10", "1/(1 + x^2)", Finite(0.0), Finite(1.0)),
    ]
}
