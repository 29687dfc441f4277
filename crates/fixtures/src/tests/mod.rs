// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod factory_tests;
mod seed_tests;

use studium_persistence::SqlitePersistence;

use crate::seed;

/// Fresh in-memory database with the baseline sites already in place.
pub fn seeded_persistence() -> SqlitePersistence {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    seed::repopulate_baseline(&mut persistence).unwrap();
    persistence
}
