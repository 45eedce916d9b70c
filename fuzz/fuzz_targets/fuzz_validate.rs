#![no_main]

use libfuzzer_sys::fuzz_target;
use nota::core::*;
use nota::engine::{ValidateOptions, Validator};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut fields = s.split('|');
    let mut next = || fields.next().unwrap_or_default();

    let issuer = PartyBuilder::new(next(), next(), next())
        .state_registration(next())
        .build();
    let record = DocumentBuilder::new(DocumentCategory::Invoice, next(), issuer)
        .add_item(
            LineItemBuilder::new(1, "X", rust_decimal::Decimal::ONE, rust_decimal::Decimal::TEN)
                .classification(next())
                .operation(next())
                .situation(next())
                .build(),
        )
        .build();

    if let Ok(validator) = Validator::new() {
        let _ = validator.validate(&record, &ValidateOptions::default());
    }
});
