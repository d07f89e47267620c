fn main() -> std::io::Result<()> {
    dutydoc_lib::run()
}
