//! 통합 테스트 -- 내장 시그니처 테이블에 대한 디스패치 동작 검증
//!
//! 실제 게임 서버 로그 라인으로 모든 리프 이벤트 종류의 추출 결과,
//! 우산 2단계 디스패치, 드리프트/무매칭 구분, 트리거 우선순위,
//! 멱등성과 스레드 안전성을 검증합니다.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use proptest::prelude::*;

use pwlog_core::event::StructuredEvent;
use pwlog_core::types::{DispatchOutcome, DriftReason};
use pwlog_dispatch::Dispatcher;

fn dispatcher() -> &'static Dispatcher {
    static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();
    DISPATCHER.get_or_init(|| Dispatcher::builtin().expect("builtin registry must build"))
}

fn matched(line: &str) -> StructuredEvent {
    match dispatcher().dispatch(line) {
        DispatchOutcome::Matched(event) => event,
        other => panic!("expected Matched for {line:?}, got {other:?}"),
    }
}

/// 필드 값을 원본 로그 표기 그대로 나열합니다.
fn values(event: &StructuredEvent) -> Vec<String> {
    event.fields().iter().map(|f| f.value.to_string()).collect()
}

/// (기대 종류, 라인, 기대 필드 값)
const SAMPLES: &[(&str, &str, &[&str])] = &[
    (
        "gm_action",
        "2024-10-06 22:10:00 pwtestes.com gamed: notice : GM:用户1024拣起金钱 cheat",
        &["2024-10-06 22:10:00", "用户1024拣起金钱 cheat"],
    ),
    (
        "chat",
        "2024-10-06 22:11:00 pwtestes.com glinkd-1: chat : Chat: src=1024 chl=1 msg=我的技能升级到10级了",
        &["2024-10-06 22:11:00", "Chat", "1024", "chl=1 msg=我的技能升级到10级了"],
    ),
    (
        "send_mail",
        "2024-10-13 10:00:00 pwtestes.com gdeliveryd: notice : formatlog:sendmail:timestamp=1728813600:src=1024:dst=1088:mid=3:size=120:money=5000:item=8103:count=1:pos=12",
        &["2024-10-13 10:00:00", "1024", "1088", "3", "120", "5000", "8103", "1", "12"],
    ),
    (
        "login",
        "2024-10-06 20:42:05 pwtestes.com glinkd-1: notice : formatlog:rolelogin:userid=1072:roleid=1041:lineid=1:localsid=147",
        &["2024-10-06 20:42:05", "1072", "1041"],
    ),
    (
        "logout",
        "2024-10-06 21:40:07 pwtestes.com glinkd-1: notice : formatlog:rolelogout:userid=1072:roleid=1041:localsid=147:time=3481",
        &["2024-10-06 21:40:07", "1072", "1041", "3481"],
    ),
    (
        "trade_add_goods",
        "2024-10-11 06:35:02 pwtestes.com gdeliveryd: notice : formatlog:trade_debug:tradeaddgoods: roleid=1088,goods is (id=8103,pos=15,count=1),money=0,tid=1",
        &["2024-10-11 06:35:02", "1088", "8103", "1", "0", "1"],
    ),
    (
        "trade_remove_goods",
        "2024-10-12 01:06:23 pwtestes.com gdeliveryd: notice : formatlog:trade_debug:traderemovegoods: roleid=1024,item (id=5029,pos=25,count=1),money=0,tid=1",
        &["2024-10-12 01:06:23", "1024", "5029", "1", "0", "1"],
    ),
    (
        "trade_submit",
        "2024-10-11 06:35:10 pwtestes.com gdeliveryd: notice : formatlog:trade_debug:tradesubmit,rid=1088,A:1024,B:1088,retcode=76,tid=1",
        &["2024-10-11 06:35:10", "1088", "1024", "1088", "1"],
    ),
    (
        "trade_save",
        "2024-10-11 06:35:16 pwtestes.com gdeliveryd: notice : formatlog:trade_debug:TradeSave:Trade done. tid=1,(Trader:1024,1088)",
        &["2024-10-11 06:35:16", "1", "1024", "1088"],
    ),
    (
        "task_give_up",
        "2024-09-24 08:03:33 pwtestes.com gamed: notice : formatlog:task:roleid=1120:taskid=33582:type=1:msg=GiveUpTask",
        &["2024-09-24 08:03:33", "1120", "33582"],
    ),
    (
        "task_receive",
        "2024-09-23 08:29:26 pwtestes.com gamed: notice : formatlog:task:roleid=1088:taskid=6436:type=1:msg=CheckDeliverTask",
        &["2024-09-23 08:29:26", "1088", "6436"],
    ),
    (
        "task_receive_item",
        "2024-09-24 08:01:17 pwtestes.com gamed: notice : formatlog:task:roleid=1088:taskid=6437:type=1:msg=DeliverItem: Item id = 3366, Count = 1",
        &["2024-09-24 08:01:17", "1088", "6437", "3366", "1"],
    ),
    (
        "task_receive_reward",
        "2024-09-24 08:01:17 pwtestes.com gamed: notice : formatlog:task:roleid=1088:taskid=6437:type=1:msg=DeliverByAwardData: success = 1, gold = 8100, exp = 13500, sp = 3000, reputation = 2",
        &["2024-09-24 08:01:17", "1088", "6437", "8100", "13500", "3000", "2"],
    ),
    (
        "kill",
        "2024-10-06 20:43:36 pwtestes.com gamed: notice : formatlog:die:roleid=1041:type=258:attacker=1024",
        &["2024-10-06 20:43:36", "1041", "1024"],
    ),
    (
        "faction_create",
        "2024-10-06 03:10:54 pwtestes.com gamedbd: notice : formatlog:faction:type=create:roleid=1024:factionid=1",
        &["2024-10-06 03:10:54", "1024", "1"],
    ),
    (
        "faction_join",
        "2024-10-12 01:00:42 pwtestes.com gamedbd: notice : formatlog:faction:type=join:roleid=1088:factionid=1",
        &["2024-10-12 01:00:42", "1088", "1"],
    ),
    (
        "faction_promote",
        "2024-10-12 01:00:56 pwtestes.com gamedbd: notice : formatlog:faction:type=promote:superior=1024:roleid=1088:factionid=1:role=5",
        &["2024-10-12 01:00:56", "1024", "1088", "1", "5", "Captain"],
    ),
    (
        "faction_leave",
        "2024-10-12 01:01:07 pwtestes.com gamedbd: notice : formatlog:faction:type=leave:roleid=1024:factionid=1:role=6",
        &["2024-10-12 01:01:07", "1024", "1"],
    ),
    (
        "faction_delete",
        "2024-10-12 01:01:29 pwtestes.com gamedbd: notice : formatlog:faction:type=delete:factionid=1",
        &["2024-10-12 01:01:29", "1"],
    ),
    (
        "faction_upgrade",
        "2024-10-06 03:11:10 pwtestes.com gamedbd: notice : formatlog:upgradefaction:factionid=1:master=1024:money=194154706:level=1",
        &["2024-10-06 03:11:10", "1", "1024", "194154706", "2"],
    ),
    (
        "gshop_trade",
        "2024-10-02 18:54:40 pwtestes.com gamed: notice : formatlog:gshop_trade:userid=1056:db_magic_number=1056:order_id=17:item_id=21508:expire=1730501681:item_count=1:cash_need=750000:cash_left=98649800:guid1=0:guid2=0",
        &["2024-10-02 18:54:40", "1056", "17", "21508", "1", "750000", "98649800"],
    ),
    (
        "party_create",
        "2024-09-27 15:46:15 pwtestes.com gamed: info : 用户1104建立了队伍(1104,0)",
        &["2024-09-27 15:46:15", "1104", "1104"],
    ),
    (
        "party_join",
        "2024-09-27 15:46:15 pwtestes.com gamed: info : 用户1184成为队员(1104,1727463280)",
        &["2024-09-27 15:46:15", "1184", "1104"],
    ),
    (
        "party_leave",
        "2024-09-27 16:08:46 pwtestes.com gamed: info : 用户1104脱离队伍(1104,1727463280)",
        &["2024-09-27 16:08:46", "1104", "1104"],
    ),
    (
        "drop_item",
        "2024-09-22 13:31:20 pwtestes.com gamed: info : 用户1072丢弃包裹1个154",
        &["2024-09-22 13:31:20", "1072", "1", "154"],
    ),
    (
        "drop_equipment",
        "2024-10-06 22:14:40 pwtestes.com gamed: info : 用户1024丢弃装备6212",
        &["2024-10-06 22:14:40", "1024", "6212"],
    ),
    (
        "pick_up_money",
        "2024-09-21 08:23:24 pwtestes.com gamed: info : 用户1028拣起金钱9",
        &["2024-09-21 08:23:24", "1028", "9"],
    ),
    (
        "discard_money",
        "2024-10-10 17:27:46 pwtestes.com gamed: info : 用户1024丢弃金钱200000",
        &["2024-10-10 17:27:46", "1024", "200000"],
    ),
    (
        "sell_item",
        "2024-09-22 01:41:36 pwtestes.com gamed: info : 用户1029卖店1个154",
        &["2024-09-22 01:41:36", "1029", "1", "154"],
    ),
    (
        "receive_money",
        "2024-09-22 03:33:47 pwtestes.com gamed: info : 用户1088得到金钱26",
        &["2024-09-22 03:33:47", "1088", "26"],
    ),
    (
        "pick_up_item",
        "2024-09-22 03:37:29 pwtestes.com gamed: info : 用户1088拣起100个410",
        &["2024-09-22 03:37:29", "1088", "100", "410"],
    ),
    (
        "level_up",
        "2024-09-22 03:41:52 pwtestes.com gamed: info : 用户1088升级到9级金钱4425,游戏时间2:01:46",
        &["2024-09-22 03:41:52", "1088", "9", "4425", "2:01:46"],
    ),
    (
        "spend_money",
        "2024-09-22 03:49:15 pwtestes.com gamed: info : 用户1088花掉金钱0",
        &["2024-09-22 03:49:15", "1088", "0"],
    ),
    (
        "spend_sp",
        "2024-09-22 03:49:15 pwtestes.com gamed: info : 用户1088消耗了sp 800",
        &["2024-09-22 03:49:15", "1088", "800"],
    ),
    (
        "skill_upgrade",
        "2024-09-22 03:49:14 pwtestes.com gamed: info : 用户1088技能245达到1级",
        &["2024-09-22 03:49:14", "1088", "245", "1"],
    ),
    (
        "craft_item",
        "2024-09-24 18:28:03 pwtestes.com gamed: info : 用户1104制造了5个11330, 配方1275, 消耗材料1823, 数量10; 材料1830, 数量15;",
        &["2024-09-24 18:28:03", "1104", "5", "11330", "1275", "1823", "10"],
    ),
    (
        "mine",
        "2024-09-21 08:23:02 pwtestes.com gamed: info : 用户1028采集得到2个1837",
        &["2024-09-21 08:23:02", "1028", "2", "1837"],
    ),
    (
        "pet_egg_hatch",
        "2024-09-24 18:56:58 pwtestes.com gamed: info : 用户1104孵化了宠物蛋31096",
        &["2024-09-24 18:56:58", "1104", "31096"],
    ),
    (
        "pet_egg_restore",
        "2024-09-24 19:02:11 pwtestes.com gamed: info : 用户1104还原了宠物蛋31096",
        &["2024-09-24 19:02:11", "1104", "31096"],
    ),
    (
        "exp_sp",
        "2024-10-06 21:52:43 pwtestes.com gamed: info : 用户1024得到经验 27/6",
        &["2024-10-06 21:52:43", "1024", "27", "6"],
    ),
];

// =============================================================================
// 리프 추출: 선언 순서대로 필드 바인딩, timestamp가 첫 필드
// =============================================================================

#[test]
fn every_sample_line_extracts_declared_fields_in_order() {
    for (kind, line, expected) in SAMPLES {
        let event = matched(line);
        assert_eq!(event.kind().as_str(), *kind, "line {line:?}");
        assert_eq!(values(&event), *expected, "kind {kind}");
        assert_eq!(event.fields()[0].name.as_ref(), "timestamp");
    }
}

#[test]
fn samples_cover_every_reachable_builtin_leaf_kind() {
    let registry = dispatcher().registry();
    let leaves: BTreeSet<&str> = registry
        .kinds()
        .map(|k| k.as_str())
        .filter(|k| !registry.is_umbrella(k))
        .collect();
    let mut covered: BTreeSet<&str> = SAMPLES.iter().map(|(kind, _, _)| *kind).collect();
    // 가려진 트리거의 종류는 dispatch_as로만 도달함
    covered.insert("pick_up_team_money");
    assert_eq!(leaves, covered);
}

#[test]
fn field_names_follow_rule_declaration() {
    let event = matched(SAMPLES.iter().find(|s| s.0 == "craft_item").unwrap().1);
    let names: Vec<&str> = event.field_names().collect();
    assert_eq!(
        names,
        vec![
            "timestamp",
            "roleid",
            "count",
            "itemid",
            "recipe",
            "material_id",
            "material_count"
        ]
    );

    let level_up = matched(SAMPLES.iter().find(|s| s.0 == "level_up").unwrap().1);
    assert_eq!(level_up.get_text("playtime"), Some("2:01:46"));
    assert_eq!(level_up.get_u64("money"), Some(4425));
}

// =============================================================================
// 문서화된 시나리오
// =============================================================================

#[test]
fn scenario_login() {
    let event = matched(
        "2024-10-06 20:42:05 pwtestes.com glinkd-1: notice : formatlog:rolelogin:userid=1072:roleid=1041:lineid=1:localsid=147",
    );
    assert_eq!(event.kind().as_str(), "login");
    assert_eq!(event.timestamp_str(), "2024-10-06 20:42:05");
    assert_eq!(event.get_u64("userid"), Some(1072));
    assert_eq!(event.get_u64("roleid"), Some(1041));
    assert_eq!(event.fields().len(), 3);
}

#[test]
fn scenario_exp_sp() {
    let event = matched("2024-10-06 21:52:43 pwtestes.com gamed: info : 用户1024得到经验 27/6");
    assert_eq!(event.kind().as_str(), "exp_sp");
    assert_eq!(event.get_u64("roleid"), Some(1024));
    assert_eq!(event.get_u64("exp"), Some(27));
    assert_eq!(event.get_u64("sp"), Some(6));
}

#[test]
fn scenario_faction_upgrade_reports_next_level() {
    let event = matched(
        "2024-10-06 03:11:10 pwtestes.com gamedbd: notice : formatlog:upgradefaction:factionid=1:master=1024:money=194154706:level=1",
    );
    assert_eq!(event.kind().as_str(), "faction_upgrade");
    assert_eq!(event.get_u64("factionid"), Some(1));
    assert_eq!(event.get_u64("roleid"), Some(1024));
    assert_eq!(event.get_u64("money"), Some(194154706));
    assert_eq!(event.get_u64("level"), Some(2));
}

#[test]
fn scenario_faction_promote_resolves_rank_name() {
    let event = matched(
        "2024-10-12 01:00:56 pwtestes.com gamedbd: notice : formatlog:faction:type=promote:superior=1024:roleid=1088:factionid=1:role=5",
    );
    assert_eq!(event.kind().as_str(), "faction_promote");
    assert_eq!(event.get_u64("superior"), Some(1024));
    assert_eq!(event.get_u64("roleid"), Some(1088));
    assert_eq!(event.get_u64("factionid"), Some(1));
    assert_eq!(event.get_u64("role"), Some(5));
    assert_eq!(event.get_text("role_name"), Some("Captain"));
}

#[test]
fn unknown_rank_code_maps_to_unknown() {
    let event = matched(
        "2024-10-12 01:00:56 pwtestes.com gamedbd: notice : formatlog:faction:type=promote:superior=1024:roleid=1088:factionid=1:role=9",
    );
    assert_eq!(event.get_text("role_name"), Some("Unknown"));
}

#[test]
fn scenario_heartbeat_is_no_match() {
    assert_eq!(
        dispatcher().dispatch("2024-01-01 00:00:00 server heartbeat ok"),
        DispatchOutcome::NoMatch
    );
}

#[test]
fn scenario_unknown_faction_action_is_uncategorized() {
    let line = "2024-10-12 01:00:00 pwtestes.com gamedbd: notice : formatlog:faction:type=unknown_future_action";
    match dispatcher().dispatch(line) {
        DispatchOutcome::Uncategorized { umbrella, line: l } => {
            assert_eq!(umbrella.as_str(), "faction");
            assert_eq!(l, line);
        }
        other => panic!("expected Uncategorized, got {other:?}"),
    }
}

// =============================================================================
// 우산 디스패치 == 하위 종류 직접 디스패치
// =============================================================================

#[test]
fn umbrella_dispatch_equals_direct_sub_kind_dispatch() {
    let registry = dispatcher().registry();
    let mut checked = 0;
    for (kind, line, _) in SAMPLES {
        let umbrella = registry
            .lookup(line)
            .expect("sample line must contain a trigger");
        if !registry.is_umbrella(umbrella.as_str()) {
            continue;
        }
        let via_umbrella = dispatcher().dispatch(line);
        let direct = dispatcher().dispatch_as(line, kind).unwrap();
        let via_kind = dispatcher().dispatch_as(line, umbrella.as_str()).unwrap();
        assert_eq!(via_umbrella, direct, "kind {kind}");
        assert_eq!(via_umbrella, via_kind, "kind {kind}");
        checked += 1;
    }
    // trade 4 + task 4 + faction 5
    assert_eq!(checked, 13);
}

#[test]
fn every_umbrella_branch_resolves_to_a_registered_kind() {
    let registry = dispatcher().registry();
    for umbrella in ["trade", "task", "faction"] {
        let branches = registry.branches(umbrella).unwrap();
        assert!(!branches.is_empty());
        for (discriminator, kind) in branches {
            assert!(!discriminator.is_empty());
            assert!(registry.contains_kind(kind.as_str()));
        }
    }
}

// =============================================================================
// 드리프트 vs 무매칭
// =============================================================================

#[test]
fn trigger_without_matching_shape_is_drift_not_no_match() {
    let line = "2024-10-06 20:42:05 pwtestes.com glinkd-1: notice : formatlog:rolelogin:user=1072";
    match dispatcher().dispatch(line) {
        DispatchOutcome::SignatureDrift { kind, line: l, reason } => {
            assert_eq!(kind.as_str(), "login");
            assert_eq!(l, line);
            assert_eq!(reason, DriftReason::PatternMismatch);
        }
        other => panic!("expected SignatureDrift, got {other:?}"),
    }
}

#[test]
fn drift_inside_umbrella_names_the_sub_kind() {
    let line = "2024-10-06 03:10:54 pwtestes.com gamedbd: notice : formatlog:faction:type=create:roleid=x:factionid=1";
    match dispatcher().dispatch(line) {
        DispatchOutcome::SignatureDrift { kind, .. } => assert_eq!(kind.as_str(), "faction_create"),
        other => panic!("expected SignatureDrift, got {other:?}"),
    }
}

#[test]
fn kill_with_unexpected_type_is_drift() {
    let line = "2024-10-06 20:43:36 pwtestes.com gamed: notice : formatlog:die:roleid=1041:type=3:attacker=1024";
    assert!(dispatcher().dispatch(line).is_drift());
}

#[test]
fn integer_overflow_is_drift_never_zero() {
    let line = "2024-09-22 03:33:47 pwtestes.com gamed: info : 用户1088得到金钱99999999999999999999999";
    match dispatcher().dispatch(line) {
        DispatchOutcome::SignatureDrift { kind, reason, .. } => {
            assert_eq!(kind.as_str(), "receive_money");
            assert!(matches!(reason, DriftReason::InvalidInteger { ref field, .. } if field == "money"));
        }
        other => panic!("expected SignatureDrift, got {other:?}"),
    }
}

#[test]
fn impossible_calendar_timestamp_is_drift() {
    let line = "2024-13-40 25:61:61 pwtestes.com gamed: info : 用户1088得到金钱26";
    match dispatcher().dispatch(line) {
        DispatchOutcome::SignatureDrift { reason, .. } => {
            assert!(matches!(reason, DriftReason::InvalidTimestamp { .. }));
        }
        other => panic!("expected SignatureDrift, got {other:?}"),
    }
}

// =============================================================================
// 트리거 우선순위
// =============================================================================

#[test]
fn earlier_trigger_wins_for_overlapping_pick_up_pair() {
    // "拣起金钱" 라인은 "拣起"도 포함하지만 먼저 선언된 pick_up_money가 이김
    let line = "2024-09-21 08:23:24 pwtestes.com gamed: info : 用户1028拣起金钱9";
    assert!(line.contains("拣起"));
    let registry = dispatcher().registry();
    assert_eq!(registry.lookup(line).map(|k| k.as_str()), Some("pick_up_money"));
    assert_eq!(matched(line).kind().as_str(), "pick_up_money");

    let triggers: Vec<&str> = registry.signatures().iter().map(|s| s.trigger()).collect();
    let money = triggers.iter().position(|t| *t == "拣起金钱").unwrap();
    let item = triggers.iter().position(|t| *t == "拣起").unwrap();
    assert!(money < item);
}

#[test]
fn chat_line_with_skill_words_is_chat_not_drift() {
    let line = "2024-10-06 22:11:00 pwtestes.com glinkd-1: chat : Chat: src=1024 chl=1 msg=我的技能升级到10级了";
    assert!(line.contains("技能") && line.contains("升级到"));

    let event = matched(line);
    assert_eq!(event.kind().as_str(), "chat");
    assert_eq!(event.get_u64("roleid"), Some(1024));
    assert_eq!(event.get_text("body"), Some("chl=1 msg=我的技能升级到10级了"));
}

#[test]
fn gm_line_wins_over_money_pickup_words() {
    let line = "2024-10-06 22:10:00 pwtestes.com gamed: notice : GM:用户1024拣起金钱 cheat";
    let outcome = dispatcher().dispatch(line);
    assert!(!outcome.is_drift());
    assert_eq!(outcome.event().map(|e| e.kind().as_str()), Some("gm_action"));
}

#[test]
fn team_money_pickup_is_shadowed_by_item_pickup() {
    let registry = dispatcher().registry();
    let shadowed = registry.shadowed();
    assert_eq!(shadowed.len(), 1);
    assert_eq!(shadowed[0].trigger, "组队拣起用户");
    assert_eq!(shadowed[0].shadowed_by, "拣起");

    // 트리거 검색은 拣起를 고르지만 종류를 지정하면 규칙이 그대로 동작함
    let line = "2024-10-14 09:00:00 pwtestes.com gamed: info : 用户1024组队拣起用户1088的金钱500";
    assert_eq!(registry.lookup(line).map(|k| k.as_str()), Some("pick_up_item"));
    let event = dispatcher()
        .dispatch_as(line, "pick_up_team_money")
        .and_then(DispatchOutcome::into_event)
        .unwrap();
    assert_eq!(event.get_u64("owner"), Some(1088));
    assert_eq!(event.get_u64("money"), Some(500));
}

#[test]
fn leading_zeros_are_not_preserved_in_integer_fields() {
    let event = matched("2024-09-22 03:33:47 pwtestes.com gamed: info : 用户01088得到金钱0026");
    assert_eq!(event.get_u64("roleid"), Some(1088));
    assert_eq!(values(&event), ["2024-09-22 03:33:47", "1088", "26"]);
}

// =============================================================================
// 직렬화
// =============================================================================

#[test]
fn matched_event_serializes_to_flat_json_in_field_order() {
    let event = matched(SAMPLES.iter().find(|s| s.0 == "login").unwrap().1);
    assert_eq!(
        event.to_json().unwrap(),
        r#"{"kind":"login","timestamp":"2024-10-06 20:42:05","userid":1072,"roleid":1041}"#
    );

    let promote = matched(SAMPLES.iter().find(|s| s.0 == "faction_promote").unwrap().1);
    let value: serde_json::Value = serde_json::from_str(&promote.to_json().unwrap()).unwrap();
    assert_eq!(value["role_name"], "Captain");
    assert_eq!(value["role"], 5);
}

// =============================================================================
// 동시성
// =============================================================================

#[test]
fn concurrent_dispatch_matches_sequential_results() {
    let shared = Arc::new(Dispatcher::builtin().unwrap());
    let expected: Vec<DispatchOutcome> = SAMPLES.iter().map(|s| shared.dispatch(s.1)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = Arc::clone(&shared);
            std::thread::spawn(move || {
                SAMPLES
                    .iter()
                    .map(|s| dispatcher.dispatch(s.1))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// =============================================================================
// 속성 기반 테스트
// =============================================================================

proptest! {
    #[test]
    fn dispatch_is_idempotent(line in ".{0,300}") {
        let first = dispatcher().dispatch(&line);
        let second = dispatcher().dispatch(&line);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn no_match_iff_no_trigger_contained(line in ".{0,300}") {
        let outcome = dispatcher().dispatch(&line);
        let has_trigger = dispatcher().registry().lookup(&line).is_some();
        prop_assert_eq!(outcome == DispatchOutcome::NoMatch, !has_trigger);
    }

    #[test]
    fn sample_lines_with_trailing_noise_stay_idempotent(
        index in 0usize..SAMPLES.len(),
        suffix in "[ -~]{0,64}",
    ) {
        let line = format!("{}{}", SAMPLES[index].1, suffix);
        let first = dispatcher().dispatch(&line);
        prop_assert!(!matches!(first, DispatchOutcome::NoMatch));
        prop_assert_eq!(first, dispatcher().dispatch(&line));
    }

    #[test]
    fn arbitrary_user_suffix_never_panics(roleid in any::<u64>(), tail in "\\PC{0,40}") {
        let line = format!("2024-09-22 03:33:47 pwtestes.com gamed: info : 用户{roleid}得到金钱{tail}");
        let _ = dispatcher().dispatch(&line);
    }
}
