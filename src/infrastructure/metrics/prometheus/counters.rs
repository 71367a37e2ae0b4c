use metrics::counter;

/// Increment the client-login counter for the given outcome.
pub fn increment_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("keygate_logins_total", "outcome" => outcome).increment(1);
}

/// Increment a counter for issued end-user credentials.
pub fn increment_credential_created() {
    counter!("keygate_credentials_created_total").increment(1);
}
