pub mod holdings_parser;
