fn main() {
    precedence::cli::run();
}
