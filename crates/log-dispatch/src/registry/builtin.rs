//! 내장 시그니처 테이블 -- Perfect World 게임 서버 로그
//!
//! 순서가 곧 계약입니다. 새 시그니처는 끝에 추가하고,
//! 기존 트리거를 포함하는 트리거는 반드시 그보다 앞에 두어야 합니다
//! (`拣起金钱`은 `拣起`보다 앞).
//!
//! GM 명령과 채팅은 본문에 `技能`, `拣起金钱` 같은 단어가 자유롭게 들어가므로
//! 맨 앞에 두고 본문을 텍스트로만 받습니다. `组队拣起用户`는 기존 처리 순서대로
//! `拣起` 뒤에 있어 가려지며, 레지스트리가 로딩 시 경고합니다.

use crate::rule::{
    Adjustment, BranchDefinition, DerivedDefinition, FieldDefinition, FieldType,
    Lookup, RuleDefinition, SignatureDefinition, UmbrellaDefinition,
};

use FieldType::{Id, Quantity, Text};

/// 모든 패턴의 첫 캡처 그룹 (`YYYY-MM-DD HH:MM:SS`)
pub const TIMESTAMP_GROUP: &str = r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})";

/// 타임스탬프 그룹 뒤에 `tail`을 붙인 리프 규칙을 만듭니다.
fn rule(kind: &str, tail: &str, fields: &[(&str, FieldType)]) -> RuleDefinition {
    let mut defs = Vec::with_capacity(fields.len() + 1);
    defs.push(FieldDefinition::timestamp());
    defs.extend(
        fields
            .iter()
            .map(|(name, field_type)| FieldDefinition::new(*name, *field_type)),
    );
    RuleDefinition::new(kind, format!("{TIMESTAMP_GROUP}{tail}"), defs)
}

fn leaf(trigger: &str, kind: &str, tail: &str, fields: &[(&str, FieldType)]) -> SignatureDefinition {
    SignatureDefinition::leaf(trigger, rule(kind, tail, fields))
}

fn branch(
    discriminator: &str,
    kind: &str,
    tail: &str,
    fields: &[(&str, FieldType)],
) -> BranchDefinition {
    BranchDefinition::leaf(discriminator, rule(kind, tail, fields))
}

/// 거래 우산: `formatlog:trade_debug` 라인
fn trade() -> UmbrellaDefinition {
    let goods = [
        ("roleid", Id),
        ("itemid", Id),
        ("count", Quantity),
        ("money", Quantity),
        ("tid", Id),
    ];
    UmbrellaDefinition::new(
        "trade",
        vec![
            branch(
                "tradeaddgoods",
                "trade_add_goods",
                r".*roleid=(\d+),goods is \(id=(\d+),pos=\d+,count=(\d+)\),money=(\d+),tid=(\d+)",
                &goods,
            ),
            branch(
                "traderemovegoods",
                "trade_remove_goods",
                r".*roleid=(\d+),item \(id=(\d+),pos=\d+,count=(\d+)\),money=(\d+),tid=(\d+)",
                &goods,
            ),
            branch(
                "tradesubmit",
                "trade_submit",
                r".*rid=(\d+),A:(\d+),B:(\d+),.*tid=(\d+)",
                &[("rid", Id), ("role_a", Id), ("role_b", Id), ("tid", Id)],
            ),
            branch(
                "TradeSave",
                "trade_save",
                r".*tid=(\d+),\(Trader:(\d+),(\d+)\)",
                &[("tid", Id), ("role_a", Id), ("role_b", Id)],
            ),
        ],
    )
}

/// 퀘스트 우산: `msg=` 뒤의 처리 결과로 구분
fn task() -> UmbrellaDefinition {
    let role_task = [("roleid", Id), ("taskid", Id)];
    UmbrellaDefinition::new(
        "task",
        vec![
            branch(
                "GiveUpTask",
                "task_give_up",
                r".*roleid=(\d+):taskid=(\d+)",
                &role_task,
            ),
            branch(
                "CheckDeliverTask",
                "task_receive",
                r".*roleid=(\d+):taskid=(\d+)",
                &role_task,
            ),
            branch(
                "DeliverItem",
                "task_receive_item",
                r".*roleid=(\d+):taskid=(\d+).*Item id = (\d+), Count = (\d+)",
                &[
                    ("roleid", Id),
                    ("taskid", Id),
                    ("itemid", Id),
                    ("count", Quantity),
                ],
            ),
            branch(
                "DeliverByAwardData",
                "task_receive_reward",
                r".*roleid=(\d+):taskid=(\d+).*gold\s*=\s*(\d+),\s*exp\s*=\s*(\d+),\s*sp\s*=\s*(\d+),\s*reputation\s*=\s*(\d+)",
                &[
                    ("roleid", Id),
                    ("taskid", Id),
                    ("gold", Quantity),
                    ("exp", Quantity),
                    ("sp", Quantity),
                    ("reputation", Quantity),
                ],
            ),
        ],
    )
}

/// 길드 우산: `type=` 토큰으로 구분
fn faction() -> UmbrellaDefinition {
    let join = RuleDefinition::new(
        "faction_join",
        r"(?P<timestamp>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\s.*roleid=(?P<roleid>\d+):factionid=(?P<factionid>\d+)",
        vec![
            FieldDefinition::timestamp(),
            FieldDefinition::new("roleid", Id),
            FieldDefinition::new("factionid", Id),
        ],
    );
    let promote = rule(
        "faction_promote",
        r".*?type=promote:superior=(\d+):roleid=(\d+):factionid=(\d+):role=(\d+)",
        &[
            ("superior", Id),
            ("roleid", Id),
            ("factionid", Id),
            ("role", Id),
        ],
    )
    .with_derived(DerivedDefinition::new(
        "role_name",
        "role",
        Lookup::FactionRank,
    ));

    UmbrellaDefinition::new(
        "faction",
        vec![
            branch(
                "type=create",
                "faction_create",
                r".*type=create:roleid=(\d+):factionid=(\d+)",
                &[("roleid", Id), ("factionid", Id)],
            ),
            BranchDefinition::leaf("type=join", join),
            BranchDefinition::leaf("type=promote", promote),
            branch(
                "type=leave",
                "faction_leave",
                r".*?type=leave:roleid=(\d+):factionid=(\d+):role=\d+",
                &[("roleid", Id), ("factionid", Id)],
            ),
            branch(
                "type=delete",
                "faction_delete",
                r".*?type=delete:factionid=(\d+)",
                &[("factionid", Id)],
            ),
        ],
    )
}

/// 우편 발송: 첨부 아이템이 없으면 `pos=-1`이므로 위치는 텍스트로 받음
fn send_mail() -> SignatureDefinition {
    leaf(
        "formatlog:sendmail",
        "send_mail",
        r".*?src=(\d+):dst=(\d+):mid=(\d+):size=(\d+):money=(\d+):item=(\d+):count=(\d+):pos=(-?\d+)",
        &[
            ("roleid", Id),
            ("receiver", Id),
            ("mailid", Id),
            ("size", Quantity),
            ("money", Quantity),
            ("itemid", Id),
            ("count", Quantity),
            ("pos", Text),
        ],
    )
}

fn faction_upgrade() -> SignatureDefinition {
    let mut upgrade = rule(
        "faction_upgrade",
        r".*?factionid=(\d+):master=(\d+):money=(\d+):level=(\d+)",
        &[
            ("factionid", Id),
            ("roleid", Id),
            ("money", Quantity),
            ("level", Quantity),
        ],
    );
    // 로그는 업그레이드 전 레벨을 기록함
    if let Some(level) = upgrade.fields.last_mut() {
        level.adjust = Adjustment::Increment;
    }
    SignatureDefinition::leaf("formatlog:upgradefaction", upgrade)
}

/// 내장 시그니처를 선언 순서대로 반환합니다.
pub fn signatures() -> Vec<SignatureDefinition> {
    let role_money = [("roleid", Id), ("money", Quantity)];
    let role_count_item = [("roleid", Id), ("count", Quantity), ("itemid", Id)];
    let role_party = [("roleid", Id), ("partyid", Id)];

    vec![
        leaf("GM:", "gm_action", r".*?GM:\s*(.*)", &[("action", Text)]),
        leaf(
            "chat :",
            "chat",
            r".*?chat : (\w+): src=(\d+)\s*(.*)",
            &[("channel", Text), ("roleid", Id), ("body", Text)],
        ),
        send_mail(),
        leaf(
            "formatlog:rolelogin",
            "login",
            r".*userid=(\d+):roleid=(\d+)",
            &[("userid", Id), ("roleid", Id)],
        ),
        leaf(
            "formatlog:rolelogout",
            "logout",
            r".*userid=(\d+):roleid=(\d+):.*time=(\d+)",
            &[("userid", Id), ("roleid", Id), ("time", Quantity)],
        ),
        SignatureDefinition::umbrella("formatlog:trade", trade()),
        SignatureDefinition::umbrella("formatlog:task", task()),
        leaf(
            "formatlog:die",
            "kill",
            r".*roleid=(\d+):type=258:.*attacker=(\d+)",
            &[("roleid", Id), ("attacker", Id)],
        ),
        SignatureDefinition::umbrella("formatlog:faction", faction()),
        faction_upgrade(),
        leaf(
            "formatlog:gshop_trade",
            "gshop_trade",
            r".*userid=(\d+):.*order_id=(\d+):item_id=(\d+):.*item_count=(\d+):cash_need=(\d+):cash_left=(\d+)",
            &[
                ("userid", Id),
                ("order_id", Id),
                ("itemid", Id),
                ("count", Quantity),
                ("cash_need", Quantity),
                ("cash_left", Quantity),
            ],
        ),
        leaf(
            "建立了队伍",
            "party_create",
            r".*?用户(\d+)建立了队伍\((\d+),\d+\)",
            &role_party,
        ),
        leaf(
            "成为队员",
            "party_join",
            r".*?用户(\d+)成为队员\((\d+),\d+\)",
            &role_party,
        ),
        leaf(
            "脱离队伍",
            "party_leave",
            r".*?用户(\d+)脱离队伍\((\d+),\d+\)",
            &role_party,
        ),
        leaf(
            "丢弃包裹",
            "drop_item",
            r".*用户(\d+)丢弃包裹(\d+)个(\d+)",
            &role_count_item,
        ),
        leaf(
            "丢弃装备",
            "drop_equipment",
            r".*用户(\d+)丢弃装备(\d+)",
            &[("roleid", Id), ("itemid", Id)],
        ),
        leaf(
            "拣起金钱",
            "pick_up_money",
            r".*?用户(\d+)拣起金钱(\d+)",
            &role_money,
        ),
        leaf(
            "丢弃金钱",
            "discard_money",
            r".*用户(\d+)丢弃金钱(\d+)",
            &role_money,
        ),
        leaf(
            "卖店",
            "sell_item",
            r".*用户(\d+)卖店(\d+)个(\d+)",
            &role_count_item,
        ),
        leaf(
            "得到金钱",
            "receive_money",
            r".*用户(\d+)得到金钱(\d+)",
            &role_money,
        ),
        leaf(
            "拣起",
            "pick_up_item",
            r".*用户(\d+)拣起(\d+)个(\d+)",
            &role_count_item,
        ),
        leaf(
            "升级到",
            "level_up",
            r".*用户(\d+)升级到(\d+)级金钱(\d+),游戏时间(\d+:\d{2}:\d{2})",
            &[
                ("roleid", Id),
                ("level", Quantity),
                ("money", Quantity),
                ("playtime", Text),
            ],
        ),
        leaf(
            "花掉金钱",
            "spend_money",
            r".*用户(\d+)花掉金钱(\d+)",
            &role_money,
        ),
        leaf(
            "消耗了sp",
            "spend_sp",
            r".*用户(\d+)消耗了sp (\d+)",
            &[("roleid", Id), ("sp", Quantity)],
        ),
        leaf(
            "技能",
            "skill_upgrade",
            r".*用户(\d+)技能(\d+)达到(\d+)级",
            &[("roleid", Id), ("skillid", Id), ("level", Quantity)],
        ),
        leaf(
            "制造了",
            "craft_item",
            r".*?用户(\d+)制造了(\d+)个(\d+), 配方(\d+), 消耗材料(\d+), 数量(\d+)",
            &[
                ("roleid", Id),
                ("count", Quantity),
                ("itemid", Id),
                ("recipe", Id),
                ("material_id", Id),
                ("material_count", Quantity),
            ],
        ),
        leaf(
            "采集得到",
            "mine",
            r".*? 用户(\d+)采集得到(\d+)个(\d+)",
            &role_count_item,
        ),
        leaf(
            "孵化了宠物蛋",
            "pet_egg_hatch",
            r".*用户(\d+)孵化了宠物蛋(\d+)",
            &[("roleid", Id), ("eggid", Id)],
        ),
        leaf(
            "还原了宠物蛋",
            "pet_egg_restore",
            r".*用户(\d+)还原了宠物蛋(\d+)",
            &[("roleid", Id), ("eggid", Id)],
        ),
        leaf(
            "组队拣起用户",
            "pick_up_team_money",
            r".*?用户(\d+)组队拣起用户(\d+)的金钱(\d+)",
            &[("roleid", Id), ("owner", Id), ("money", Quantity)],
        ),
        leaf(
            "得到经验",
            "exp_sp",
            r".*?用户(\d+)得到经验 (\d+)/(\d+)",
            &[("roleid", Id), ("exp", Quantity), ("sp", Quantity)],
        ),
    ]
}
