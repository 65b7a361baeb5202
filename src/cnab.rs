// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::BufRead;

use crate::error::IngestError;
use crate::models::RawRecord;

/// Fixed-width CNAB layout: 1-indexed, inclusive column ranges for
/// type, date, amount, cpf, card, time, shop owner, shop name.
pub const LAYOUT: [(usize, usize); 8] = [
    (1, 1),
    (2, 9),
    (10, 19),
    (20, 30),
    (31, 42),
    (43, 48),
    (49, 62),
    (63, 80),
];

/// Total line width implied by the layout.
pub const LINE_WIDTH: usize = 80;

/// Slices one line into a `RawRecord`. Columns are character positions, so
/// accented shop names occupy one column per character. Numeric columns
/// (type, date, amount, time) must be all digits; padding inside
/// alphanumeric fields is preserved for the transformer to deal with.
pub fn decode_line(line: &str, line_no: u64) -> Result<RawRecord, IngestError> {
    let chars: Vec<char> = line.trim_end_matches(['\r', '\n']).chars().collect();
    if chars.len() < LINE_WIDTH {
        return Err(IngestError::Decode {
            line: line_no,
            reason: format!(
                "expected {} columns, got {} in '{}'",
                LINE_WIDTH,
                chars.len(),
                line.trim_end()
            ),
        });
    }
    if chars[LINE_WIDTH..].iter().any(|c| !c.is_whitespace()) {
        return Err(IngestError::Decode {
            line: line_no,
            reason: format!("unexpected content past column {}", LINE_WIDTH),
        });
    }

    let field = |idx: usize| -> String {
        let (start, end) = LAYOUT[idx];
        chars[start - 1..end].iter().collect()
    };
    let digits = |idx: usize, name: &str| -> Result<String, IngestError> {
        let s = field(idx);
        if s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(s)
        } else {
            Err(IngestError::Decode {
                line: line_no,
                reason: format!("non-numeric {} field '{}'", name, s),
            })
        }
    };

    let type_code: u8 = digits(0, "type")?.parse().map_err(|_| IngestError::Decode {
        line: line_no,
        reason: format!("invalid type field '{}'", field(0)),
    })?;
    let date = digits(1, "date")?;
    let amount_cents: u64 = digits(2, "amount")?
        .parse()
        .map_err(|_| IngestError::Decode {
            line: line_no,
            reason: format!("invalid amount field '{}'", field(2)),
        })?;
    let time = digits(5, "time")?;

    Ok(RawRecord {
        type_code,
        date,
        amount_cents,
        cpf: field(3),
        card: field(4),
        time,
        shop_owner: field(6),
        shop_name: field(7),
    })
}

/// Lazy, fail-fast record reader over a line-oriented byte stream.
///
/// Yields `Ok(RawRecord)` per decodable line; after the first error no
/// further records are produced, so a misaligned file can never emit
/// misaligned records past the failure point. Blank lines are skipped.
pub struct Decoder<R> {
    lines: std::io::Lines<R>,
    line_no: u64,
    failed: bool,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Decoder {
            lines: reader.lines(),
            line_no: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for Decoder<R> {
    type Item = Result<RawRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(l) => l,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(IngestError::Io(e)));
                }
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let record = decode_line(&line, self.line_no);
            if record.is_err() {
                self.failed = true;
            }
            return Some(record);
        }
    }
}
