#![no_main]

use libfuzzer_sys::fuzz_target;
use pwlog_dispatch::{RegistryBuilder, SignatureLoader};

fuzz_target!(|data: &[u8]| {
    let Ok(yaml_str) = std::str::from_utf8(data) else {
        return;
    };

    // 파싱/검증/컴파일 실패는 에러로 끝나야 하며 패닉은 허용하지 않음
    if let Ok(definitions) = SignatureLoader::parse_yaml(yaml_str, "fuzz-input.yml") {
        let _ = RegistryBuilder::new().signatures(definitions).build();
    }
});
