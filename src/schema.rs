diesel::table! {
    appointments (id) {
        id -> Int4,
        intent -> Nullable<Text>,
        name -> Nullable<Text>,
        problem_description -> Nullable<Text>,
        location -> Nullable<Text>,
        contact -> Nullable<Text>,
        time_slot -> Nullable<Text>,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    technicians (id) {
        id -> Int4,
        name -> Text,
        expertise -> Text,
        location -> Text,
        contact -> Text,
        email -> Text,
        password -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(appointments, technicians);
