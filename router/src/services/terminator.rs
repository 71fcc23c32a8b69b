//! Real process exit

use shared::{ProcessId, process_debug};

use crate::traits::Terminator;

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn exit(&self, code: i32) {
        process_debug!(ProcessId::current(), "Exiting with code {}", code);
        std::process::exit(code);
    }
}
