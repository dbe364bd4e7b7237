fn main() {
    // Short build identifier, shown in logs and the web UI footer.
    // No rerun-if-changed, so every build gets a fresh one.
    let id = uuid::Uuid::new_v4().simple().to_string();
    let short_id = id.get(..8).unwrap_or(&id);
    println!("cargo:rustc-env=BUILD_ID={}", short_id);
}
