#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pwlog_dispatch::Dispatcher;

/// 우산 트리거 뒤에 임의 본문을 붙인 라인
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    umbrella: FuzzUmbrella,
    body: String,
}

#[derive(Arbitrary, Debug)]
enum FuzzUmbrella {
    Trade,
    Task,
    Faction,
}

impl FuzzUmbrella {
    fn kind(&self) -> &'static str {
        match self {
            Self::Trade => "trade",
            Self::Task => "task",
            Self::Faction => "faction",
        }
    }

    fn trigger(&self) -> &'static str {
        match self {
            Self::Trade => "formatlog:trade_debug:",
            Self::Task => "formatlog:task:",
            Self::Faction => "formatlog:faction:",
        }
    }
}

fn dispatcher() -> &'static Dispatcher {
    static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();
    DISPATCHER.get_or_init(|| Dispatcher::builtin().expect("builtin registry"))
}

fuzz_target!(|input: FuzzInput| {
    let line = format!(
        "2024-10-12 01:00:00 pwtestes.com gamedbd: notice : {}{}",
        input.umbrella.trigger(),
        input.body
    );

    // 앞선 트리거가 본문에 없다면 우산 처리와 종류 직접 지정은 같은 결과
    let registry = dispatcher().registry();
    if registry.lookup(&line).map(|k| k.as_str()) == Some(input.umbrella.kind()) {
        let direct = dispatcher().dispatch_as(&line, input.umbrella.kind());
        assert_eq!(Some(dispatcher().dispatch(&line)), direct);
    }
});
