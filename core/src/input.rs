/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use base64::{engine::general_purpose::STANDARD, Engine};

use super::consts::*;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn greater_than_zero<
    T: std::str::FromStr + std::cmp::PartialOrd + std::fmt::Display + Default,
>(
    s: &str,
) -> Result<T, String> {
    let num: T = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;

    if num > T::default() {
        Ok(num)
    } else {
        Err(format!("`{}` is not larger than 0", s))
    }
}

pub fn check_username(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("Username cannot be empty".to_string());
    }

    if s.len() > MAX_USERNAME_LEN {
        return Err(format!(
            "Username cannot be longer than {} characters",
            MAX_USERNAME_LEN
        ));
    }

    if s.contains(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_') {
        return Err("Username can only contain letters, numbers, dashes, and underscores".to_string());
    }

    Ok(())
}

pub fn check_text_field(name: &str, s: &str, max_len: usize) -> Result<(), String> {
    if s.trim().is_empty() {
        return Err(format!("{} cannot be empty", name));
    }

    if s.len() > max_len {
        return Err(format!("{} cannot be longer than {} characters", name, max_len));
    }

    Ok(())
}

/// Comma-separated tag list, as entered by the client. Empty segments are
/// dropped rather than rejected.
pub fn parse_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}

/// Images travel as base64 text and are stored verbatim; this only proves
/// the payload decodes and fits the configured size cap.
pub fn check_image(s: &str, max_bytes: usize) -> Result<(), String> {
    if s.is_empty() {
        return Err("Image payload is missing".to_string());
    }

    let decoded = STANDARD
        .decode(s)
        .map_err(|_| "Image payload is not valid base64".to_string())?;

    if decoded.is_empty() {
        return Err("Image payload is empty".to_string());
    }

    if decoded.len() > max_bytes {
        return Err(format!("Image exceeds the {} byte limit", max_bytes));
    }

    Ok(())
}

pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().replace(char::from(25), "")
}
