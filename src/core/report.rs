use super::format::{format_currency, format_monthly};
use super::scenarios::{ScenarioInputs, ScenarioKind, ScenarioReport};

pub const FORMULA_LINE: &str = "勞保年金計算公式：平均月投保薪資 × 年資 × 1.55%（擇優給付）";
pub const DISCLAIMER_LINE: &str = "此報告為初步試算結果，實際金額以勞保局核定為準。";

fn plan_heading(kind: ScenarioKind) -> &'static str {
    match kind {
        ScenarioKind::Current => "方案 A：目前薪資",
        ScenarioKind::ExtendedCurrent => "方案 B：續拚 (原薪)",
        ScenarioKind::Projected => "方案 C：調薪後預估",
        ScenarioKind::ExtendedProjected => "方案 D：續拚 (調薪)",
    }
}

fn plan_note(kind: ScenarioKind, report: &ScenarioReport) -> String {
    match kind {
        ScenarioKind::Current => format!("依投保級距 {} 計算", optional_amount(report.current_grade)),
        ScenarioKind::ExtendedCurrent => "投保年資多 5 年，薪資不變".to_string(),
        ScenarioKind::Projected => format!(
            "依預估級距 {} 計算",
            format_currency(i64::from(report.projected_salary))
        ),
        ScenarioKind::ExtendedProjected => "投保年資多 5 年，且有調薪".to_string(),
    }
}

fn optional_amount(value: Option<u32>) -> String {
    value
        .map(|v| format_currency(i64::from(v)))
        .unwrap_or_else(|| "-".to_string())
}

fn optional_number(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Plain-text version of the printable estimate report.
pub fn render_report(inputs: &ScenarioInputs, report: &ScenarioReport) -> String {
    let mut lines = vec![
        "勞保老年年金試算報告".to_string(),
        "=".repeat(24),
        String::new(),
        "[輸入條件]".to_string(),
        format!(
            "出生年份：民國 {} 年 (法定退休: {}歲)",
            optional_number(inputs.birth_year),
            report.statutory_age
        ),
        format!(
            "工作期間：{} 歲 ~ {} 歲",
            optional_number(inputs.work_start_age),
            optional_number(inputs.retirement_age)
        ),
        format!("預計投保年資：{} 年", optional_number(inputs.insured_years)),
        format!("目前投保薪資：{}", optional_amount(report.current_grade)),
        format!(
            "退休前預估投保薪資：{}",
            format_currency(i64::from(report.projected_salary))
        ),
    ];
    if let Some(err) = &report.working_span_error {
        lines.push(format!("注意：{err}"));
    }

    lines.push(String::new());
    lines.push("[試算結果比較]".to_string());
    for kind in ScenarioKind::CARD_ORDER {
        let Some(scenario) = report.scenario(kind) else {
            continue;
        };
        let result = scenario.result_or_empty();
        lines.push(String::new());
        lines.push(plan_heading(kind).to_string());
        lines.push(format!("  {}", plan_note(kind, report)));
        for option in [&result.option1, &result.option2] {
            let label = if option.label.is_empty() {
                "-"
            } else {
                option.label.as_str()
            };
            lines.push(format!("  {label}  {}", format_monthly(option.amount)));
        }
    }

    lines.push(String::new());
    lines.push(FORMULA_LINE.to_string());
    lines.push(DISCLAIMER_LINE.to_string());
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
