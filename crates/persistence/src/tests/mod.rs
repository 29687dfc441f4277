// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod baseline_tests;
mod session_tests;
mod user_tests;

use crate::NewUser;

pub fn create_test_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: String::from("Test"),
        last_name: String::from("User"),
        gender: String::from("Other"),
        is_staff: false,
        is_superuser: false,
        password: String::from("initial-password"),
    }
}
