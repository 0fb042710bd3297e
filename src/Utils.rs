//! different utility modules used throughout the project
/// tiny module to set up the terminal and file loggers
pub mod logger;
/// pretty-printing of task results with the tabled crate
pub mod statistics;
/// task files: integrals to solve and run settings, solved one by one or on the rayon pool
pub mod integration_task;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into sections
pub mod task_parser;
///
mod task_parser_tests;
