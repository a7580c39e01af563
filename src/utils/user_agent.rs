/// Client signature sent with `mining.subscribe`
pub fn user_agent() -> String {
    format!(
        "saseul-pool-miner/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
