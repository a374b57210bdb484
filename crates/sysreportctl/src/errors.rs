//! Exit status for sysreportctl

use sysreport_common::ReportError;

/// Exit code for success, including a declined or aborted report
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for errors outside a report run (config, arguments, I/O)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code for an upload that failed or was cut short
pub const EXIT_SEND_ERROR: i32 = 5;

/// Exit code for Ctrl-C.
///
/// Before an upload starts nothing is lost. During one the report is stored
/// but may not have reached the server.
pub fn interrupt_exit_code(upload_in_flight: bool) -> i32 {
    if upload_in_flight {
        EXIT_SEND_ERROR
    } else {
        EXIT_SUCCESS
    }
}

/// Exit code for a failed command.
///
/// Report failures keep their own codes, even under added context.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ReportError>()
        .map(ReportError::exit_code)
        .unwrap_or(EXIT_GENERAL_ERROR)
}
