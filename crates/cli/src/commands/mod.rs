//! One module per subcommand. Each `cmd_*` prints its result to stdout and
//! exits with status 1 on failure.

pub(crate) mod explain;
pub(crate) mod generate;
