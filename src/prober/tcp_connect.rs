use std::net::SocketAddr;

use tokio::net::TcpStream;
use tokio::time::{timeout, Duration, Instant};

use super::ProbeError;

/// Time a fresh TCP connect to `addr`, bounded by `limit` when one is set.
pub async fn probe_tcp(addr: SocketAddr, limit: Option<Duration>) -> Result<Duration, ProbeError> {
    let start = Instant::now();
    let conn_fut = TcpStream::connect(addr);
    let conn = match limit {
        Some(limit) => timeout(limit, conn_fut)
            .await
            .map_err(|_| ProbeError::ConnectTimeout(addr))?,
        None => conn_fut.await,
    }
    .map_err(|source| ProbeError::Connect { addr, source })?;
    let elapsed = start.elapsed();
    drop(conn);
    Ok(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let elapsed = probe_tcp(addr, Some(Duration::from_secs(2))).await.unwrap();
        assert!(elapsed < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = probe_tcp(addr, Some(Duration::from_secs(2))).await.unwrap_err();
        assert!(matches!(err, ProbeError::Connect { addr: a, .. } if a == addr));
    }
}
