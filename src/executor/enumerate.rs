//! Test case enumeration

use tracing::debug;

use super::backend::{ProcessBackend, LIST_TESTS_FLAG};
use super::error::ExecError;

/// Ask `executable` for the names of the test cases it contains
///
/// Every non-empty stdout line is taken verbatim as a test name. An
/// executable that prints nothing simply has no tests.
pub async fn list_tests(backend: &ProcessBackend, executable: &str) -> Result<Vec<String>, ExecError> {
    let output = backend
        .run(executable, &[LIST_TESTS_FLAG.to_string()])
        .await?;

    debug!(
        "{} lists {} test cases",
        executable,
        output.stdout_lines.len()
    );

    Ok(output.stdout_lines)
}
