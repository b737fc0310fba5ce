// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{format_age, format_age_ms};

#[yare::parameterized(
    zero          = { 0, "0s" },
    seconds       = { 59, "59s" },
    one_minute    = { 60, "1m" },
    minutes       = { 3599, "59m" },
    exact_hour    = { 3600, "1h" },
    hour_minutes  = { 3900, "1h05m" },
    many_hours    = { 86399, "23h59m" },
    exact_day     = { 86400, "1d" },
    day_and_hours = { 97200, "1d3h" },
)]
fn age(secs: u64, expected: &str) {
    assert_eq!(format_age(secs), expected);
}

#[yare::parameterized(
    five_seconds = { 5_000, "5s" },
    eleven_min   = { 660_000, "11m" },
)]
fn age_ms(ms: u64, expected: &str) {
    assert_eq!(format_age_ms(ms), expected);
}
