// Account store tables. Only the columns read by the service are declared.

diesel::table! {
    accounts (akey) {
        #[max_length = 255]
        akey -> Varchar,
        #[max_length = 255]
        token -> Varchar,
    }
}

diesel::table! {
    settings (akey) {
        #[max_length = 255]
        akey -> Varchar,
        #[max_length = 255]
        email -> Nullable<Varchar>,
        push -> Bool,
        telegram -> Nullable<Int8>,
        #[max_length = 8]
        lng -> Varchar,
    }
}

diesel::table! {
    stats (akey) {
        #[max_length = 255]
        akey -> Varchar,
    }
}

diesel::joinable!(settings -> accounts (akey));
diesel::joinable!(stats -> accounts (akey));

diesel::allow_tables_to_appear_in_same_query!(accounts, settings, stats,);
