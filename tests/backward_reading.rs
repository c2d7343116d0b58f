//! Backward traversal: reverse boundary scanning, carry-over across earlier
//! chunks, and forward/backward symmetry.

mod common;

use linewise::{Input, LineReader, LineRecord};

use common::{collect, reference_lines, texts};

fn as_tuples(records: &[LineRecord]) -> Vec<(u64, Option<u64>, i64, String)> {
    records
        .iter()
        .map(|r| (r.bytes_read, r.total_size, r.line_no, r.text.clone()))
        .collect()
}

async fn backward(data: impl Into<bytes::Bytes>) -> Vec<LineRecord> {
    let (_cancel, reader) = LineReader::blob_backward(Input::memory(data), "utf-8").unwrap();
    collect(reader).await
}

async fn forward(data: impl Into<bytes::Bytes>) -> Vec<LineRecord> {
    let (_cancel, reader) = LineReader::blob_forward(Input::memory(data), "utf-8").unwrap();
    collect(reader).await
}

#[tokio::test]
async fn last_line_first_with_byte_accounting() {
    let records = backward("1abc\n2def\n3hij\n4klm").await;

    assert_eq!(
        as_tuples(&records),
        [
            (4, Some(19), -1, "4klm".to_string()),
            (9, Some(19), -2, "3hij".to_string()),
            (14, Some(19), -3, "2def".to_string()),
            (19, Some(19), -4, "1abc".to_string()),
        ]
    );
}

#[tokio::test]
async fn terminated_input_leads_with_empty_line() {
    // The zero-length region after the final `\n` is a line of its own;
    // byte accounting still covers the input exactly.
    let records = backward("1abc\n2def\n3hij\n").await;

    assert_eq!(
        as_tuples(&records),
        [
            (0, Some(15), -1, "".to_string()),
            (5, Some(15), -2, "3hij".to_string()),
            (10, Some(15), -3, "2def".to_string()),
            (15, Some(15), -4, "1abc".to_string()),
        ]
    );
}

#[tokio::test]
async fn mirrors_forward_traversal_on_unterminated_input() {
    let data = b"alpha\nbeta\r\n\ngamma\ntail";
    let fwd = forward(&data[..]).await;
    let bwd = backward(&data[..]).await;

    let mut mirrored = texts(&fwd);
    mirrored.reverse();
    assert_eq!(texts(&bwd), mirrored);

    // Forward line k pairs with backward line k - M - 1, so line 1 ↔ -M
    let m = fwd.len() as i64;
    for (f, b) in fwd.iter().zip(bwd.iter().rev()) {
        assert_eq!(f.text, b.text);
        assert_eq!(b.line_no, f.line_no - m - 1);
    }
    assert_eq!(bwd.last().unwrap().line_no, -m);
    assert_eq!(bwd.last().unwrap().bytes_read, data.len() as u64);
}

#[tokio::test]
async fn crlf_terminators_stripped_and_counted() {
    let records = backward("ab\r\ncd\r\n").await;

    assert_eq!(texts(&records), ["", "cd", "ab"]);
    assert_eq!(records[1].bytes_read, 4);
    assert_eq!(records[2].bytes_read, 8);
}

#[tokio::test]
async fn dangling_cr_stays_attached() {
    let records = backward("one\ntwo\r").await;

    assert_eq!(texts(&records), ["two\r", "one"]);
    assert_eq!(records[0].bytes_read, 4);
    assert_eq!(records[1].bytes_read, 8);
}

#[tokio::test]
async fn interior_empty_lines_survive() {
    let records = backward("a\n\n\nb").await;

    assert_eq!(texts(&records), ["b", "", "", "a"]);
    assert_eq!(records.last().unwrap().bytes_read, 5);
    assert_eq!(records.last().unwrap().line_no, -4);
}

#[tokio::test]
async fn large_blob_crosses_range_boundaries() {
    // 20-byte lines straddle the internal 64 KiB ranges, exercising the
    // carry of line heads into earlier chunks.
    let mut data = Vec::new();
    for i in 0..10_000 {
        data.extend_from_slice(format!("{:019}\n", i).as_bytes());
    }
    // Drop the final terminator so the traversals mirror exactly.
    data.pop();
    assert!(data.len() > 2 * 64 * 1024);

    let bwd = backward(data.clone()).await;
    assert_eq!(bwd.len(), 10_000);

    let mut expected = reference_lines(&data);
    expected.reverse();
    assert_eq!(texts(&bwd), expected);
    assert_eq!(bwd.last().unwrap().bytes_read, data.len() as u64);
    assert_eq!(bwd.last().unwrap().line_no, -10_000);
}
