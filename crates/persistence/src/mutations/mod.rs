// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutations for the harness database.
//!
//! Mutations that back the idempotent seeding protocol are written as
//! conflict-tolerant upserts so repeated runs against a reused database
//! converge instead of failing on unique constraints.

pub mod courses;
pub mod roles;
pub mod sessions;
pub mod sites;
pub mod users;
