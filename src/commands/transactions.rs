// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::models::TransactionKind;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let kind = TransactionKind::from_code(r.r#type as u8)
                    .map(|k| k.description)
                    .unwrap_or("?");
                vec![
                    r.date.clone(),
                    r.hour.clone(),
                    kind.to_string(),
                    r.amount.clone(),
                    r.cpf.clone(),
                    r.card.clone(),
                    r.shop_owner.clone(),
                    r.shop_name.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Hour", "Kind", "Amount", "CPF", "Card", "Owner", "Shop"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub r#type: i64,
    pub date: String,
    pub amount: String,
    pub cpf: String,
    pub card: String,
    pub hour: String,
    pub shop_owner: String,
    pub shop_name: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT id, type, date, amount, cpf, card, hour, shop_owner, shop_name \
         FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(cpf) = sub.get_one::<String>("cpf") {
        sql.push_str(" AND cpf=?");
        params_vec.push(cpf.trim().into());
    }
    if let Some(code) = sub.get_one::<u8>("type") {
        sql.push_str(" AND type=?");
        params_vec.push(code.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(TransactionRow {
            id: r.get(0)?,
            r#type: r.get(1)?,
            date: r.get(2)?,
            amount: r.get(3)?,
            cpf: r.get(4)?,
            card: r.get(5)?,
            hour: r.get(6)?,
            shop_owner: r.get(7)?,
            shop_name: r.get(8)?,
        });
    }
    Ok(data)
}
