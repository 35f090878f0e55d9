use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::error::TelemetryError;

pub const ORDERS_EMITTED: &str = "basketmm_orders_emitted_total";
pub const BASKETS_SKIPPED: &str = "basketmm_baskets_skipped_total";
pub const RESERVATION_BID: &str = "basketmm_reservation_bid";
pub const RESERVATION_ASK: &str = "basketmm_reservation_ask";

pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .map_err(|_| TelemetryError::SubscriberInstalled)
}

pub fn describe_metrics() {
    metrics::describe_counter!(ORDERS_EMITTED, "Orders emitted per basket and decision branch");
    metrics::describe_counter!(BASKETS_SKIPPED, "Baskets skipped for insufficient leg liquidity");
    metrics::describe_gauge!(RESERVATION_BID, "Last reservation bid per basket");
    metrics::describe_gauge!(RESERVATION_ASK, "Last reservation ask per basket");
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(addr: SocketAddr) -> Result<(), TelemetryError> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    describe_metrics();
    metrics::gauge!("basketmm_up").set(1.0);
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(_addr: SocketAddr) -> Result<(), TelemetryError> {
    describe_metrics();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_only_once() {
        let _ = init_tracing("basket_mm=debug");
        assert!(matches!(init_tracing("info"), Err(TelemetryError::SubscriberInstalled)));
    }

    #[cfg(not(feature = "metrics-exporter"))]
    #[test]
    fn test_init_metrics_without_exporter() {
        init_metrics(([127, 0, 0, 1], 9000).into()).unwrap();
    }
}
