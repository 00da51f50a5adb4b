//! CLI command implementations

pub(crate) mod common;
pub(crate) mod count;
pub(crate) mod init;
pub(crate) mod policy;
pub(crate) mod record;
pub(crate) mod report;
pub(crate) mod reprocess;
pub(crate) mod seed;
pub(crate) mod status;

#[cfg(test)]
pub(crate) mod test_support;
