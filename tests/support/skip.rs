/// Skip a test if gpg is not on PATH.
#[macro_export]
macro_rules! skip_without_gpg {
    () => {
        if which::which("gpg").is_err() {
            eprintln!("SKIPPED: gpg not found on PATH");
            return;
        }
    };
}

/// Skip a test if `touch` is not on PATH. CLI tests use it as a signer.
#[macro_export]
macro_rules! skip_without_touch {
    () => {
        if which::which("touch").is_err() {
            eprintln!("SKIPPED: touch not found on PATH");
            return;
        }
    };
}
