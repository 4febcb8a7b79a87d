use std::io::{Cursor, Write};
use std::time::Duration;

use anyhow::Result;
use dumpscope::config::FilterConfig;
use dumpscope::decoder::{ReaderSource, DELIMITER, FRAME_LEN};
use dumpscope::engine::{Session, SessionError, SessionState, StopReason};
use dumpscope::ViewerConfig;

fn frame(timestamp: u16, source: u8, destination: u8, payload: u8) -> Vec<u8> {
    let mut bytes = vec![0u8; FRAME_LEN];
    bytes[..2].copy_from_slice(&timestamp.to_le_bytes());
    bytes[6] = source;
    bytes[7] = destination;
    bytes[9] = payload;
    bytes[FRAME_LEN - 2] = DELIMITER;
    bytes[FRAME_LEN - 1] = DELIMITER;
    bytes
}

fn config() -> ViewerConfig {
    ViewerConfig {
        x: FilterConfig::new("01", "02"),
        y: FilterConfig::new("03", "04"),
        z: FilterConfig::new("05", "06"),
        average_blocks: 1,
        read_chunk: 7,
        ..ViewerConfig::default()
    }
}

fn dump() -> Vec<u8> {
    let mut bytes = Vec::new();
    for t in 1..=4u16 {
        bytes.extend(frame(t, 0x01, 0x02, 10 * t as u8));
        bytes.extend(frame(t, 0x03, 0x04, 20));
        bytes.extend(frame(t, 0x05, 0x06, 40));
    }
    bytes
}

#[tokio::test]
async fn test_decode_in_memory_dump() -> Result<()> {
    let mut session = Session::new(config());
    session
        .start(Box::new(ReaderSource::new("memory", Cursor::new(dump()))))
        .await?;

    let summary = session.wait().await?;

    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames, 12);
    assert_eq!(summary.bytes, 12 * FRAME_LEN as u64);
    assert_eq!(session.records().len(), 12);
    assert_eq!(session.state(), SessionState::Finished { frames: 12 });

    Ok(())
}

#[tokio::test]
async fn test_points_from_decoded_records() -> Result<()> {
    let mut session = Session::new(config());
    session
        .start(Box::new(ReaderSource::new("memory", Cursor::new(dump()))))
        .await?;
    session.wait().await?;

    let plain = session.compute_points(false)?;
    assert_eq!(plain.len(), 4);
    assert_eq!(plain[3].z, 1.0);
    assert_eq!(plain[3].x, 1.0);

    let averaged = session.compute_points(true)?;
    assert_eq!(averaged.len(), 2);

    let scene = session.scene(false)?;
    assert_eq!(scene.points, plain);
    assert_eq!(scene.projections.xy.len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_load_file_and_feed_rows() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(&dump())?;
    file.flush()?;

    let mut session = Session::new(config());
    let feed = session.subscribe();
    session.load(file.path()).await?;
    session.wait().await?;

    let rows: Vec<_> = feed.try_iter().collect();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0].index, 0);
    assert_eq!(rows[0].source, "01");
    assert_eq!(rows[0].payload, "0a");
    assert_eq!(rows[11].destination, "06");

    Ok(())
}

#[tokio::test]
async fn test_missing_dump_is_reported() {
    let mut session = Session::new(config());
    let result = session.load("/nonexistent/dumpscope/dump.bin").await;

    assert!(matches!(result, Err(SessionError::MissingDump { .. })));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_stop_cancels_stalled_source() -> Result<()> {
    let mut first = frame(1, 0x01, 0x02, 50);
    first.extend(frame(2, 0x01, 0x02, 60));
    // Half a frame arrives, then the source stalls
    first.extend_from_slice(&frame(3, 0x01, 0x02, 70)[..10]);

    let reader = tokio_test::io::Builder::new()
        .read(&first)
        .wait(Duration::from_secs(60))
        .build();

    let mut session = Session::new(config());
    session
        .start(Box::new(ReaderSource::new("stalled", reader)))
        .await?;

    while session.records().len() < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(session.is_reading());

    session.stop();
    let summary = session.wait().await?;

    assert_eq!(summary.stop_reason, StopReason::Cancelled);
    // The half-buffered third frame is never emitted
    assert_eq!(session.records().len(), 2);
    assert_eq!(session.state(), SessionState::Stopped { frames: 2 });

    Ok(())
}

#[tokio::test]
async fn test_cannot_load_twice_while_reading() -> Result<()> {
    let reader = tokio_test::io::Builder::new()
        .wait(Duration::from_secs(60))
        .build();

    let mut session = Session::new(config());
    session
        .start(Box::new(ReaderSource::new("stalled", reader)))
        .await?;

    let again = session
        .start(Box::new(ReaderSource::new("memory", Cursor::new(dump()))))
        .await;
    assert!(matches!(again, Err(SessionError::AlreadyReading)));

    session.stop_handle().expect("decode task running").stop();
    session.wait().await?;
    Ok(())
}

#[tokio::test]
async fn test_reload_replaces_records() -> Result<()> {
    let mut session = Session::new(config());
    session
        .start(Box::new(ReaderSource::new("first", Cursor::new(dump()))))
        .await?;
    session.wait().await?;
    assert_eq!(session.records().len(), 12);

    session
        .start(Box::new(ReaderSource::new("second", Cursor::new(frame(9, 1, 2, 3)))))
        .await?;
    session.wait().await?;
    assert_eq!(session.records().len(), 1);
    assert_eq!(session.metrics().frames_decoded, 1);

    Ok(())
}

#[tokio::test]
async fn test_points_during_decoding_use_prefix() -> Result<()> {
    let reader = tokio_test::io::Builder::new()
        .read(&dump()[..6 * FRAME_LEN])
        .wait(Duration::from_secs(60))
        .build();

    let mut session = Session::new(config());
    session
        .start(Box::new(ReaderSource::new("partial", reader)))
        .await?;

    while session.records().len() < 6 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let points = session.compute_points(false)?;
    assert_eq!(points.len(), 2);

    session.stop();
    session.wait().await?;
    Ok(())
}

#[tokio::test]
async fn test_invalid_filter_reported_before_aggregation() -> Result<()> {
    let mut bad = config();
    bad.z = FilterConfig::new("05", "6");

    let mut session = Session::new(bad);
    session
        .start(Box::new(ReaderSource::new("memory", Cursor::new(dump()))))
        .await?;
    session.wait().await?;

    let err = session.compute_points(false).unwrap_err();
    assert!(matches!(err, SessionError::Filter(_)));
    Ok(())
}

#[tokio::test]
async fn test_rows_read_from_record_log_without_feed() -> Result<()> {
    let mut session = Session::new(config());
    session
        .start(Box::new(ReaderSource::new("memory", Cursor::new(dump()))))
        .await?;
    session.wait().await?;

    let rows = session.rows(3);
    let indices: Vec<usize> = rows.iter().map(|row| row.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(rows[1].source, "03");
    assert_eq!(rows[2].payload, "28");

    assert!(session.rows(0).is_empty());
    assert_eq!(session.rows(100).len(), 12);
    Ok(())
}
