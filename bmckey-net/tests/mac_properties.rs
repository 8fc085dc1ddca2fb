//! Property-based tests for hardware address text handling.

use bmckey_net::MacAddress;
use proptest::prelude::*;

fn render(bytes: &[u8; 6], layout: u8, upper: bool) -> String {
    let pairs: Vec<String> = bytes
        .iter()
        .map(|b| {
            if upper {
                format!("{b:02X}")
            } else {
                format!("{b:02x}")
            }
        })
        .collect();
    match layout {
        0 => pairs.concat(),
        1 => pairs.join(":"),
        2 => pairs.join("-"),
        _ => pairs
            .chunks(2)
            .map(|c| c.concat())
            .collect::<Vec<_>>()
            .join("."),
    }
}

proptest! {
    /// Every supported layout parses to the same bytes and formats canonically.
    #[test]
    fn any_layout_formats_canonically(bytes in any::<[u8; 6]>(), layout in 0u8..4, upper in any::<bool>()) {
        let text = render(&bytes, layout, upper);
        let mac = MacAddress::parse(&text).unwrap();

        prop_assert_eq!(mac.octets(), bytes);
        prop_assert_eq!(mac.to_string(), hex::encode(bytes));
    }

    /// Canonical text always parses back to the same address.
    #[test]
    fn canonical_text_round_trips(bytes in any::<[u8; 6]>()) {
        let mac = MacAddress::new(bytes);
        prop_assert_eq!(MacAddress::parse(&mac.to_string()).unwrap(), mac);
    }

    /// Arbitrary short strings never panic the parser.
    #[test]
    fn parser_never_panics(s in "\\PC{0,20}") {
        let _ = MacAddress::parse(&s);
    }
}
