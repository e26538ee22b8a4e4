//! Unit test target; submodules exercise one subsystem each.

mod cancellation;
mod config_env;
mod label_conventions;
mod parameter_serialization;
mod registry_lookup;
