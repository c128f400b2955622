//! Diesel schema for invitation persistence.

diesel::table! {
    /// Invitation records keyed by referral code.
    invitations (code) {
        /// Referral code.
        #[max_length = 64]
        code -> Varchar,
        /// Invitee address.
        #[max_length = 320]
        email -> Varchar,
        /// Issuing party.
        referrer_id -> Int8,
        /// End of the validity window.
        valid_until -> Timestamptz,
        /// Invitation lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Whether consumption keeps the invitation open.
        allow_multiple_use -> Bool,
        /// Number of multi-use consumptions.
        use_count -> Int4,
        /// Caller-supplied attributes.
        attributes -> Jsonb,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
