pub(super) mod info;
pub(super) mod metrics;
pub(super) mod status;
