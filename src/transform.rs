// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::error::IngestError;
use crate::models::{RawRecord, Transaction, TransactionKind};
use crate::utils::{parse_cnab_date, parse_cnab_time};

/// Maps a decoded record to a domain transaction. Pure, no I/O.
///
/// The amount arrives as unsigned integer cents; it is scaled by 100 with
/// exact decimal semantics and signed according to the type table. Shop
/// owner and name lose their fixed-width padding here; cpf and card pass
/// through untouched.
pub fn transform(raw: &RawRecord) -> Result<Transaction, IngestError> {
    let kind = TransactionKind::from_code(raw.type_code)
        .ok_or(IngestError::UnknownTransactionType(raw.type_code))?;

    let date = parse_cnab_date(&raw.date)?;
    let time = parse_cnab_time(&raw.time)?;

    // Ten decoded digits always fit in i64.
    let mut amount = Decimal::new(raw.amount_cents as i64, 2);
    if kind.sign < 0 {
        amount = -amount;
    }

    Ok(Transaction {
        id: None,
        kind: kind.code,
        date,
        amount,
        cpf: raw.cpf.clone(),
        card: raw.card.clone(),
        time,
        shop_owner: raw.shop_owner.trim().to_string(),
        shop_name: raw.shop_name.trim().to_string(),
    })
}
