#![allow(non_snake_case)]
use RustedIntegral::Utils::integration_task::{TaskFile, TaskSettings, builtin_examples, load_task_file, run_tasks};
use RustedIntegral::Utils::logger::init_logger;
use RustedIntegral::Utils::statistics::print_statistics;
use log::info;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

/// rusted_integral [task_file]
/// without a task file the built-in examples are solved
fn main() -> ExitCode {
    let task_file = match std::env::args().nth(1) {
        Some(path) => match load_task_file(Path::new(&path)) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => TaskFile {
            tasks: builtin_examples(),
            settings: TaskSettings::default(),
        },
    };
    let settings = &task_file.settings;
    init_logger(settings.loglevel, settings.logfile);
    info!("solving {} integrals", task_file.tasks.len());

    let begin = Instant::now();
    let reports = run_tasks(&task_file.tasks, settings.parallel);
    print_statistics(&reports, begin.elapsed());

    if reports.iter().all(|report| report.outcome.is_ok()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
