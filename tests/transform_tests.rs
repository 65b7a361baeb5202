// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveTime};
use cnabclip::error::IngestError;
use cnabclip::models::RawRecord;
use cnabclip::transform::transform;
use rust_decimal::Decimal;

fn raw(code: u8, cents: u64) -> RawRecord {
    RawRecord {
        type_code: code,
        date: "20190301".into(),
        amount_cents: cents,
        cpf: "09620676017".into(),
        card: "4753****3153".into(),
        time: "153453".into(),
        shop_owner: "JOAO MACEDO   ".into(),
        shop_name: "BAR DO JOAO       ".into(),
    }
}

#[test]
fn sign_follows_the_type_table_for_every_code() {
    let expected: [(u8, i8); 9] = [
        (1, 1),
        (2, -1),
        (3, -1),
        (4, 1),
        (5, 1),
        (6, 1),
        (7, 1),
        (8, 1),
        (9, -1),
    ];
    for (code, sign) in expected {
        let t = transform(&raw(code, 100)).unwrap();
        if sign > 0 {
            assert!(t.amount.is_sign_positive(), "code {} should be inflow", code);
        } else {
            assert!(t.amount.is_sign_negative(), "code {} should be outflow", code);
        }
    }
}

#[test]
fn scales_cents_exactly() {
    let credit = transform(&raw(4, 1050)).unwrap();
    assert_eq!(credit.amount, Decimal::new(1050, 2));
    assert_eq!(credit.amount.to_string(), "10.50");

    let debit = transform(&raw(2, 1050)).unwrap();
    assert_eq!(debit.amount, Decimal::new(-1050, 2));
    assert_eq!(debit.amount.to_string(), "-10.50");
}

#[test]
fn one_cent_scales_without_float_noise() {
    let t = transform(&raw(1, 1)).unwrap();
    assert_eq!(t.amount.to_string(), "0.01");
}

#[test]
fn unknown_type_codes_are_rejected_never_defaulted() {
    for code in [0u8, 10, 99] {
        let err = transform(&raw(code, 100)).unwrap_err();
        assert!(
            matches!(err, IngestError::UnknownTransactionType(c) if c == code),
            "code {} must fail, got: {}",
            code,
            err
        );
    }
}

#[test]
fn trims_shop_fields_but_not_cpf_or_card() {
    let mut r = raw(1, 100);
    r.cpf = "00012345678".into();
    let t = transform(&r).unwrap();
    assert_eq!(t.shop_owner, "JOAO MACEDO");
    assert_eq!(t.shop_name, "BAR DO JOAO");
    assert_eq!(t.cpf, "00012345678");
    assert_eq!(t.card, "4753****3153");
}

#[test]
fn parses_date_and_time_fields() {
    let t = transform(&raw(1, 100)).unwrap();
    assert_eq!(t.date, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());
    assert_eq!(t.time, NaiveTime::from_hms_opt(15, 34, 53).unwrap());
}

#[test]
fn rejects_invalid_calendar_date() {
    let mut r = raw(1, 100);
    r.date = "20191301".into();
    let err = transform(&r).unwrap_err();
    assert!(matches!(err, IngestError::InvalidDate(_)));
    assert!(err.to_string().contains("20191301"));
}

#[test]
fn rejects_invalid_time() {
    let mut r = raw(1, 100);
    r.time = "256161".into();
    let err = transform(&r).unwrap_err();
    assert!(matches!(err, IngestError::InvalidTime(_)));
}

#[test]
fn id_is_unassigned_until_persisted() {
    let t = transform(&raw(1, 100)).unwrap();
    assert!(t.id.is_none());
}
