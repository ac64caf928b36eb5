use std::env::VarError;

const TEMPLATE_SQL_DSN: &str = "TEMPLATE_SQL_DSN";

/// Connection string override from the environment
pub fn get_dsn_override() -> Option<String> {
    dsn_override(std::env::var(TEMPLATE_SQL_DSN))
}

fn dsn_override(dsn_from_env: Result<String, VarError>) -> Option<String> {
    dsn_from_env.ok().filter(|dsn| !dsn.trim().is_empty())
}
