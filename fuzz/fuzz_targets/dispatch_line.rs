#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use pwlog_core::types::DispatchOutcome;
use pwlog_dispatch::Dispatcher;

fn dispatcher() -> &'static Dispatcher {
    static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();
    DISPATCHER.get_or_init(|| Dispatcher::builtin().expect("builtin registry"))
}

fuzz_target!(|data: &[u8]| {
    // 라인은 UTF-8 문자열로만 들어옴
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let outcome = dispatcher().dispatch(line);

    // 트리거가 없을 때만 NoMatch
    let has_trigger = dispatcher().registry().lookup(line).is_some();
    assert_eq!(outcome == DispatchOutcome::NoMatch, !has_trigger);

    // 같은 라인은 항상 같은 결과
    assert_eq!(outcome, dispatcher().dispatch(line));

    if let DispatchOutcome::Matched(event) = outcome {
        assert_eq!(event.fields()[0].name.as_ref(), "timestamp");
        let _ = event.to_json();
    }
});
