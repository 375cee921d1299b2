//! Optional metrics instrumentation for Trickle.
//!
//! When the `observe` feature is enabled, connection lifecycle and
//! traversal progress emit counters, histograms, and gauges via the
//! [`metrics`] crate. A downstream application must install a metrics
//! recorder (e.g. `metrics-exporter-prometheus`) to collect the data.
//!
//! When the feature is **not** enabled every function in this module is a
//! zero-cost no-op.

/// Record a connection being opened.
///
/// - `trickle.connections.open` – gauge, incremented
/// - `trickle.connections.opened_total` – counter
#[inline]
pub fn record_connection_opened() {
    #[cfg(feature = "observe")]
    {
        metrics::gauge!("trickle.connections.open").increment(1.0);
        metrics::counter!("trickle.connections.opened_total").increment(1);
    }
}

/// Record a connection being released.
///
/// - `trickle.connections.open` – gauge, decremented
#[inline]
pub fn record_connection_released() {
    #[cfg(feature = "observe")]
    {
        metrics::gauge!("trickle.connections.open").decrement(1.0);
    }
}

/// Record items handed to a consumer.
///
/// - `trickle.rows.yielded_total` – counter with `stream` label
#[inline]
pub fn record_rows_yielded(stream: &'static str, count: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("trickle.rows.yielded_total", "stream" => stream)
            .increment(count as u64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (stream, count);
    }
}

/// Record a page fetch (counter + duration).
///
/// - `trickle.pages.fetched_total` – counter
/// - `trickle.page.fetch_duration_seconds` – histogram
#[inline]
pub fn record_page_fetch(duration: std::time::Duration, rows: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("trickle.pages.fetched_total").increment(1);
        metrics::histogram!("trickle.page.fetch_duration_seconds").record(duration.as_secs_f64());
        metrics::counter!("trickle.rows.yielded_total", "stream" => "page")
            .increment(rows as u64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (duration, rows);
    }
}

/// Record a failed query.
///
/// - `trickle.query.failures_total` – counter
#[inline]
pub fn record_query_failure() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("trickle.query.failures_total").increment(1);
    }
}
