use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "HTTP control plane for a load-generation engine - inspect status and metrics, scale virtual users, and stop runs."
)]
pub struct ControlPlaneArgs {
    /// Address the control API listens on
    #[arg(long = "address", short = 'a', env = "LOADAPI_ADDRESS", default_value = "127.0.0.1:6565")]
    pub address: String,

    /// Initial number of active virtual users reported by the stub engine
    #[arg(long = "vus", default_value_t = 1)]
    pub vus: u64,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_loopback() -> Result<(), String> {
        let args = ControlPlaneArgs::try_parse_from(["loadapi"])
            .map_err(|err| format!("parse failed: {}", err))?;
        assert_eq!(args.address, "127.0.0.1:6565");
        assert_eq!(args.vus, 1);
        assert!(!args.verbose);
        Ok(())
    }

    #[test]
    fn address_and_vus_override() -> Result<(), String> {
        let args =
            ControlPlaneArgs::try_parse_from(["loadapi", "-a", "0.0.0.0:7777", "--vus", "25"])
                .map_err(|err| format!("parse failed: {}", err))?;
        assert_eq!(args.address, "0.0.0.0:7777");
        assert_eq!(args.vus, 25);
        Ok(())
    }
}
