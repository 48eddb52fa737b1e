//! Network reachability check done before any fetch

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

use super::ConnectivityProbe;

/// Considers the network up if a TCP connection to `host` opens in time.
pub struct TcpConnectivityProbe {
    host: String,
    timeout: Duration,
    offline_message: String,
}

impl TcpConnectivityProbe {
    pub fn new(host: impl Into<String>, timeout: Duration, offline_message: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            timeout,
            offline_message: offline_message.into(),
        }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpConnectivityProbe {
    async fn has_connection(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(self.host.as_str())).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                tracing::info!(host = %self.host, error = %e, "Connectivity probe failed");
                false
            }
            Err(_) => {
                tracing::info!(host = %self.host, timeout_ms = self.timeout.as_millis() as u64, "Connectivity probe timed out");
                false
            }
        }
    }

    fn offline_message(&self) -> String {
        self.offline_message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn reachable_listener_counts_as_online() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let probe = TcpConnectivityProbe::new(addr.to_string(), Duration::from_secs(1), "offline");
        assert!(probe.has_connection().await);
    }

    #[tokio::test]
    async fn closed_port_counts_as_offline() {
        // Bind then drop to get a port nothing listens on
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let probe = TcpConnectivityProbe::new(addr.to_string(), Duration::from_secs(1), "You are offline");
        assert!(!probe.has_connection().await);
        assert_eq!(probe.offline_message(), "You are offline");
    }
}
