use rigburn_core::SystemSpecs;
use tracing::{debug, instrument};

/// Inspect the host. Values that cannot be read stay empty and render as
/// "hardware undetectable".
#[instrument]
pub fn detect_system() -> SystemSpecs {
    let logical = num_cpus::get();
    let physical = num_cpus::get_physical();

    let specs = SystemSpecs {
        logical_cores: (logical > 0).then_some(logical),
        physical_cores: (physical > 0).then_some(physical),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
    };
    debug!(cores = %specs.cores_label(), platform = %specs.platform(), "Detected system");
    specs
}
