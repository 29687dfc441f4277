// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    users (user_id) {
        user_id -> BigInt,
        username -> Text,
        email -> Text,
        first_name -> Text,
        last_name -> Text,
        gender -> Text,
        is_staff -> Integer,
        is_superuser -> Integer,
        is_active -> Integer,
        password_hash -> Text,
        created_at -> Nullable<Text>,
    }
}

diesel::table! {
    user_roles (role_id) {
        role_id -> BigInt,
        user_id -> BigInt,
        site_id -> BigInt,
        role -> Text,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_key -> Text,
        user_id -> BigInt,
        auth_hash -> Text,
        created_at -> Nullable<Text>,
        expires_at -> Text,
    }
}

diesel::table! {
    sites (site_id) {
        site_id -> BigInt,
        domain -> Text,
        name -> Text,
    }
}

diesel::table! {
    semesters (semester_id) {
        semester_id -> BigInt,
        year -> Integer,
        term -> Text,
    }
}

diesel::table! {
    courses (course_id) {
        course_id -> BigInt,
        semester_id -> BigInt,
        site_id -> BigInt,
        meta_name -> Text,
    }
}

diesel::table! {
    enrollments (enrollment_id) {
        enrollment_id -> BigInt,
        student_id -> BigInt,
        course_id -> BigInt,
    }
}

diesel::table! {
    assignments (assignment_id) {
        assignment_id -> BigInt,
        course_id -> BigInt,
        title -> Text,
    }
}

diesel::table! {
    assignment_comments (comment_id) {
        comment_id -> BigInt,
        assignment_id -> BigInt,
        author_id -> BigInt,
        body -> Text,
        created_at -> Nullable<Text>,
    }
}

diesel::table! {
    student_profiles (profile_id) {
        profile_id -> BigInt,
        user_id -> BigInt,
        profile_type -> Text,
        status -> Text,
        year_of_admission -> Integer,
    }
}

diesel::table! {
    notification_types (type_id) {
        type_id -> BigInt,
        code -> Text,
    }
}
