fn main() {
    uniffi::generate_scaffolding("src/waterwatch.udl").unwrap();
}
