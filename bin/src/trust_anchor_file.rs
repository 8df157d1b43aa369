// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Trust-anchor file grammar (§4.3 expansion): `trust-anchors { ... };`
//! blocks carrying `initial-key`/`static-key`/`initial-ds`/`static-ds`
//! entries, plus the legacy `trusted-keys`/`managed-keys` block shapes.
//! Hand-written recursive descent, like the rest of this tool's
//! configuration-text parsing -- the grammar is not a registry-crate
//! target.

use data_encoding::{BASE64, HEXLOWER_PERMISSIVE};

use delv_proto::dnssec::{Algorithm, DigestType, TrustAnchor, TrustAnchorStore};
use delv_proto::rr::rdata::{DNSKEY, DS};
use delv_proto::rr::Name;

use crate::error::{CliError, CliResult};

/// Parses `text` (the full contents of an anchor file) and loads every
/// entry it names into a fresh `TrustAnchorStore`.
pub fn parse(text: &str) -> CliResult<TrustAnchorStore> {
    let tokens = tokenize(text)?;
    let mut pos = 0;
    let mut store = TrustAnchorStore::empty();

    while pos < tokens.len() {
        let keyword = &tokens[pos];
        pos += 1;
        match keyword.as_str() {
            "trust-anchors" => pos = parse_trust_anchors_block(&tokens, pos, &mut store)?,
            "trusted-keys" => pos = parse_trusted_keys_block(&tokens, pos, &mut store)?,
            "managed-keys" => pos = parse_trusted_keys_block(&tokens, pos, &mut store)?,
            other => return Err(CliError::Anchor(format!("unknown block type {other}"))),
        }
    }

    Ok(store)
}

#[derive(Debug, Eq, PartialEq)]
enum Token {
    Word(String),
    QuotedOrWord(String),
    OpenBrace,
    CloseBrace,
    Semicolon,
}

fn tokenize(text: &str) -> CliResult<Vec<String>> {
    // Flattened to plain strings: braces/semicolons are kept as their own
    // one-character tokens, quoted strings lose their quotes. Comments
    // starting with `//` or `#` run to end of line, matching named.conf
    // convention.
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    while chars.next_if(|&c| c != '\n').is_some() {}
                } else {
                    return Err(CliError::Anchor("unexpected '/' outside comment".into()));
                }
            }
            '{' => {
                chars.next();
                tokens.push(Token::OpenBrace);
            }
            '}' => {
                chars.next();
                tokens.push(Token::CloseBrace);
            }
            ';' => {
                chars.next();
                tokens.push(Token::Semicolon);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    s.push(c);
                }
                tokens.push(Token::QuotedOrWord(s));
            }
            _ => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '{' | '}' | ';' | '"') {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(s));
            }
        }
    }

    Ok(tokens
        .into_iter()
        .map(|t| match t {
            Token::Word(s) | Token::QuotedOrWord(s) => s,
            Token::OpenBrace => "{".to_string(),
            Token::CloseBrace => "}".to_string(),
            Token::Semicolon => ";".to_string(),
        })
        .collect())
}

fn expect<'a>(tokens: &'a [String], pos: usize, expected: &str) -> CliResult<&'a str> {
    match tokens.get(pos) {
        Some(t) if t == expected => Ok(t.as_str()),
        Some(t) => Err(CliError::Anchor(format!("expected '{expected}', found '{t}'"))),
        None => Err(CliError::Anchor(format!("expected '{expected}', found end of file"))),
    }
}

fn next<'a>(tokens: &'a [String], pos: usize) -> CliResult<&'a str> {
    tokens
        .get(pos)
        .map(String::as_str)
        .ok_or_else(|| CliError::Anchor("unexpected end of file".into()))
}

fn parse_u16(tokens: &[String], pos: usize) -> CliResult<u16> {
    next(tokens, pos)?.parse().map_err(|_| CliError::Anchor(format!("expected a number, found '{}'", tokens[pos])))
}

fn parse_u8(tokens: &[String], pos: usize) -> CliResult<u8> {
    next(tokens, pos)?.parse().map_err(|_| CliError::Anchor(format!("expected a number, found '{}'", tokens[pos])))
}

/// `trust-anchors { <name> <kind> <fields...> ; ... };`
fn parse_trust_anchors_block(tokens: &[String], mut pos: usize, store: &mut TrustAnchorStore) -> CliResult<usize> {
    expect(tokens, pos, "{")?;
    pos += 1;

    while tokens.get(pos).map(String::as_str) != Some("}") {
        let name = Name::from_str_checked(next(tokens, pos)?)?;
        pos += 1;
        let kind = next(tokens, pos)?.to_string();
        pos += 1;

        let (anchor, new_pos) = match kind.as_str() {
            "initial-key" => {
                let (key, p) = parse_key_fields(tokens, pos)?;
                (TrustAnchor::InitialKey(key), p)
            }
            "static-key" => {
                let (key, p) = parse_key_fields(tokens, pos)?;
                (TrustAnchor::StaticKey(key), p)
            }
            "initial-ds" => {
                let (ds, p) = parse_ds_fields(tokens, pos)?;
                (TrustAnchor::InitialDS(ds), p)
            }
            "static-ds" => {
                let (ds, p) = parse_ds_fields(tokens, pos)?;
                (TrustAnchor::StaticDS(ds), p)
            }
            other => return Err(CliError::Anchor(format!("unknown trust anchor kind {other}"))),
        };
        pos = new_pos;

        expect(tokens, pos, ";")?;
        pos += 1;

        store.add(name, anchor).map_err(|e| CliError::Anchor(e.to_string()))?;
    }

    expect(tokens, pos, "}")?;
    pos += 1;
    expect(tokens, pos, ";")?;
    Ok(pos + 1)
}

/// `trusted-keys { <name> <flags> <protocol> <algorithm> "<base64key>"; ... };`
/// `managed-keys` uses the same per-entry shape, with an extra
/// `initial-key`/`static-key` keyword immediately after the name that this
/// parser accepts and ignores (both forms are treated identically, per
/// §4.3's note that this tool implements no automated rollover).
fn parse_trusted_keys_block(tokens: &[String], mut pos: usize, store: &mut TrustAnchorStore) -> CliResult<usize> {
    expect(tokens, pos, "{")?;
    pos += 1;

    while tokens.get(pos).map(String::as_str) != Some("}") {
        let name = Name::from_str_checked(next(tokens, pos)?)?;
        pos += 1;

        if matches!(next(tokens, pos)?, "initial-key" | "static-key") {
            pos += 1;
        }

        let (key, new_pos) = parse_key_fields(tokens, pos)?;
        pos = new_pos;

        expect(tokens, pos, ";")?;
        pos += 1;

        store
            .add(name, TrustAnchor::StaticKey(key))
            .map_err(|e| CliError::Anchor(e.to_string()))?;
    }

    expect(tokens, pos, "}")?;
    pos += 1;
    expect(tokens, pos, ";")?;
    Ok(pos + 1)
}

fn parse_key_fields(tokens: &[String], pos: usize) -> CliResult<(DNSKEY, usize)> {
    let flags = parse_u16(tokens, pos)?;
    let protocol = parse_u8(tokens, pos + 1)?;
    let algorithm = Algorithm::from(parse_u8(tokens, pos + 2)?);
    let encoded = next(tokens, pos + 3)?;
    let key = BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| CliError::Anchor(format!("bad base64 key material: {e}")))?;
    Ok((DNSKEY::new(flags, protocol, algorithm, key), pos + 4))
}

fn parse_ds_fields(tokens: &[String], pos: usize) -> CliResult<(DS, usize)> {
    let key_tag = parse_u16(tokens, pos)?;
    let algorithm = Algorithm::from(parse_u8(tokens, pos + 1)?);
    let digest_type = DigestType::from(parse_u8(tokens, pos + 2)?);
    let encoded = next(tokens, pos + 3)?;
    let digest = HEXLOWER_PERMISSIVE
        .decode(encoded.as_bytes())
        .map_err(|e| CliError::Anchor(format!("bad hex digest: {e}")))?;
    Ok((DS::new(key_tag, algorithm, digest_type, digest), pos + 4))
}

/// Extension used only by this parser: `Name::from_str` already exists on
/// the type but returning a `CliError` here instead of a `ProtoError` keeps
/// this module's error type consistent.
trait NameFromStrChecked {
    fn from_str_checked(s: &str) -> CliResult<Name>;
}

impl NameFromStrChecked for Name {
    fn from_str_checked(s: &str) -> CliResult<Name> {
        s.parse().map_err(|e: delv_proto::ProtoError| CliError::Anchor(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trust_anchors_block_with_ds_entry() {
        let text = r#"
            trust-anchors {
                . initial-ds 20326 8 2 "E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D0";
            };
        "#;
        let store = parse(text).unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.find(&Name::root()).len(), 1);
    }

    #[test]
    fn parses_legacy_trusted_keys_block() {
        let text = r#"
            trusted-keys {
                example.com. 257 3 8 "AwEAAaetidLzsKWUeDV1lsQy" ;
            };
        "#;
        let store = parse(text).unwrap();
        assert_eq!(store.find(&"example.com.".parse().unwrap()).len(), 1);
    }

    #[test]
    fn rejects_unknown_block_keyword() {
        let err = parse("bogus-block { };").unwrap_err();
        assert!(matches!(err, CliError::Anchor(_)));
    }
}
