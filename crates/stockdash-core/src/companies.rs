//! Static company directory served by `/companies`.

use crate::CompanyDirectoryEntry;

/// The fixed set of companies offered by the dashboard.
pub const COMPANIES: [CompanyDirectoryEntry; 10] = [
    entry("AAPL", "Apple Inc."),
    entry("GOOGL", "Alphabet Inc."),
    entry("MSFT", "Microsoft Corp."),
    entry("TSLA", "Tesla Inc."),
    entry("AMZN", "Amazon.com Inc."),
    entry("META", "Meta Platforms Inc."),
    entry("NFLX", "Netflix Inc."),
    entry("NVDA", "NVIDIA Corp."),
    entry("BABA", "Alibaba Group"),
    entry("TCS.NS", "Tata Consultancy Services"),
];

const fn entry(symbol: &'static str, name: &'static str) -> CompanyDirectoryEntry {
    CompanyDirectoryEntry { symbol, name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    #[test]
    fn every_directory_symbol_is_a_valid_ticker() {
        for entry in COMPANIES {
            let symbol = Symbol::parse(entry.symbol).expect("directory symbol must parse");
            assert_eq!(symbol.as_str(), entry.symbol);
        }
    }
}
