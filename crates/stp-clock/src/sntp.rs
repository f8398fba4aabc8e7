//! Minimal SNTP client (RFC 4330).
//!
//! Sends a single client request and reads the server's transmit timestamp.
//! No round-trip delay correction; the clock display only needs seconds.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::net::UdpSocket;

use crate::{ClockError, TimeSource};

pub const DEFAULT_NTP_HOST: &str = "time.windows.com";
pub const DEFAULT_NTP_PORT: u16 = 123;

/// Default time to wait for a reply.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const PACKET_LEN: usize = 48;

/// LI = 0, VN = 3, Mode = 3 (client).
const CLIENT_HEADER: u8 = 0x1B;

const MODE_SERVER: u8 = 4;

/// Seconds from 1900-01-01 (NTP era 0) to 1970-01-01.
const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

/// Seconds in one NTP era.
const NTP_ERA: i64 = 1 << 32;

/// Builds a client request packet.
pub fn build_request() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = CLIENT_HEADER;
    packet
}

/// Reads the transmit timestamp from a server reply.
///
/// Timestamps with the high bit clear are taken to be in era 1 (after
/// February 2036).
pub fn parse_response(packet: &[u8]) -> Result<DateTime<Utc>, ClockError> {
    if packet.len() < PACKET_LEN {
        return Err(ClockError::InvalidPacket(format!(
            "expected {PACKET_LEN} bytes, got {}",
            packet.len()
        )));
    }

    let mode = packet[0] & 0x07;
    if mode != MODE_SERVER {
        return Err(ClockError::InvalidPacket(format!(
            "expected server mode {MODE_SERVER}, got {mode}"
        )));
    }

    if packet[1] == 0 {
        let code = String::from_utf8_lossy(&packet[12..16]).trim_end_matches('\0').to_string();
        return Err(ClockError::KissOfDeath { code });
    }

    let seconds = u32::from_be_bytes([packet[40], packet[41], packet[42], packet[43]]);
    let fraction = u32::from_be_bytes([packet[44], packet[45], packet[46], packet[47]]);
    if seconds == 0 && fraction == 0 {
        return Err(ClockError::InvalidPacket(
            "missing transmit timestamp".to_string(),
        ));
    }

    let mut ntp_seconds = i64::from(seconds);
    if seconds & 0x8000_0000 == 0 {
        ntp_seconds += NTP_ERA;
    }
    let nanos = (u64::from(fraction) * 1_000_000_000) >> 32;

    DateTime::from_timestamp(
        ntp_seconds - NTP_UNIX_OFFSET,
        u32::try_from(nanos).unwrap_or(0),
    )
    .ok_or_else(|| ClockError::InvalidPacket("timestamp out of range".to_string()))
}

/// Queries an NTP server over UDP.
#[derive(Clone)]
pub struct SntpClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl fmt::Debug for SntpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SntpClient")
            .field("server", &format_args!("{}:{}", self.host, self.port))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SntpClient {
    fn default() -> Self {
        Self::new(DEFAULT_NTP_HOST, DEFAULT_NTP_PORT)
    }
}

impl SntpClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends one request and waits for the reply.
    pub async fn query(&self) -> Result<DateTime<Utc>, ClockError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
        socket.connect((self.host.as_str(), self.port)).await?;
        socket.send(&build_request()).await?;

        let mut buf = [0u8; 512];
        let received = tokio::time::timeout(self.timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| ClockError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;

        let time = parse_response(&buf[..received])?;
        tracing::debug!(host = %self.host, %time, "received network time");
        Ok(time)
    }
}

#[async_trait]
impl TimeSource for SntpClient {
    async fn network_time(&self) -> Result<DateTime<Utc>, ClockError> {
        self.query().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2026-10-18T10:00:00Z in NTP era 0 seconds.
    const SAMPLE_SECONDS: u32 = 4_001_306_400;

    fn reply(seconds: u32, fraction: u32) -> [u8; PACKET_LEN] {
        let mut packet = [0u8; PACKET_LEN];
        packet[0] = 0x1C; // LI 0, VN 3, mode 4
        packet[1] = 2;
        packet[40..44].copy_from_slice(&seconds.to_be_bytes());
        packet[44..48].copy_from_slice(&fraction.to_be_bytes());
        packet
    }

    fn expected() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-18T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn request_is_client_mode_v3() {
        let request = build_request();
        assert_eq!(request.len(), 48);
        assert_eq!(request[0], 0x1B);
        assert!(request[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn parses_transmit_timestamp() {
        assert_eq!(parse_response(&reply(SAMPLE_SECONDS, 0)).unwrap(), expected());
    }

    #[test]
    fn parses_fraction_as_nanoseconds() {
        let time = parse_response(&reply(SAMPLE_SECONDS, 0x8000_0000)).unwrap();
        assert_eq!(time.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn rejects_short_packets() {
        assert!(matches!(
            parse_response(&[0x1C; 12]),
            Err(ClockError::InvalidPacket(_))
        ));
    }

    #[test]
    fn rejects_non_server_mode() {
        let mut packet = reply(SAMPLE_SECONDS, 0);
        packet[0] = 0x1B;
        assert!(matches!(
            parse_response(&packet),
            Err(ClockError::InvalidPacket(_))
        ));
    }

    #[test]
    fn kiss_of_death_reports_code() {
        let mut packet = reply(SAMPLE_SECONDS, 0);
        packet[1] = 0;
        packet[12..16].copy_from_slice(b"RATE");
        match parse_response(&packet) {
            Err(ClockError::KissOfDeath { code }) => assert_eq!(code, "RATE"),
            other => panic!("expected kiss-of-death, got {other:?}"),
        }
    }

    #[test]
    fn timestamps_without_high_bit_are_era_one() {
        let time = parse_response(&reply(1, 0)).unwrap();
        assert_eq!(time.timestamp(), NTP_ERA + 1 - NTP_UNIX_OFFSET);
    }

    #[tokio::test]
    async fn query_reads_reply_from_server() {
        let server = UdpSocket::bind(("127.0.0.1", 0)).await.unwrap();
        let port = server.local_addr().unwrap().port();

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (len, peer) = server.recv_from(&mut buf).await.unwrap();
            assert_eq!(len, PACKET_LEN);
            assert_eq!(buf[0], 0x1B);
            server
                .send_to(&reply(SAMPLE_SECONDS, 0), peer)
                .await
                .unwrap();
        });

        let client = SntpClient::new("127.0.0.1", port);
        assert_eq!(client.query().await.unwrap(), expected());
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn query_times_out_without_reply() {
        let silent = UdpSocket::bind(("127.0.0.1", 0)).await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let client = SntpClient::new("127.0.0.1", port).with_timeout(Duration::from_millis(50));
        assert!(matches!(
            client.query().await,
            Err(ClockError::Timeout { .. })
        ));
        drop(silent);
    }
}
