// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Queries for the harness database.
//!
//! Lookups by natural key return `Ok(None)` on miss so callers can
//! distinguish "absent" from "query failed".

pub mod courses;
pub mod sessions;
pub mod users;
