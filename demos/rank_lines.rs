//! Rank a small sample catalog against a query and print the winners.
//!
//! Run with: `cargo run --example rank_lines -- getUser`

fn main() {
    let query_text = std::env::args().nth(1).unwrap_or_else(|| String::from("getUser"));
    let catalog = [
        "getUserById",
        "setUser",
        "getUser",
        "fetchData",
        "AAPL",
        "Bristol-Myers Squibb",
        "src/reader.rs",
        "useReducer",
        "GET_USER_BY_NAME",
    ];

    let query = tern::prepare(&query_text);
    for m in tern::top_matches(catalog, &query, 5) {
        println!("{:>6.4}  {:<10}  {}", m.score, format!("{:?}", m.kind), m.candidate);
    }
}
