use crate::domain::model::{CalculationOutcome, FootprintResult};
use std::fmt::Write;

const DEFAULT_RECOMMENDATIONS: &str = "请根据具体情况制定减排措施。";

/// 產生純文字碳足跡報告
pub fn render_report(outcome: &CalculationOutcome) -> String {
    let result = &outcome.footprint;
    let mut out = String::new();

    // write! on String cannot fail
    let _ = writeln!(out, "企业碳足迹计算报告");
    let _ = writeln!(out, "====================");
    let _ = writeln!(out);
    let _ = writeln!(out, "企业名称：{}", result.company_info.name);
    if let Some(industry) = &result.company_info.industry {
        let _ = writeln!(out, "所属行业：{}", industry);
    }
    let _ = writeln!(out, "计算时间：{}", result.calculation_time);
    let _ = writeln!(out);

    write_totals(&mut out, result);
    write_product(&mut out, result);
    write_cbam(&mut out, result);

    let _ = writeln!(out, "4. 减排建议");
    let _ = writeln!(out, "----------");
    let _ = writeln!(
        out,
        "{}",
        outcome
            .recommendations
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(DEFAULT_RECOMMENDATIONS)
    );

    if !outcome.scenarios.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "5. 情景模拟");
        let _ = writeln!(out, "----------");
        for scenario in &outcome.scenarios {
            let _ = writeln!(
                out,
                "{}：减排 {}%，CBAM 税负节省 {} 欧元，投资回收期 {} 年",
                scenario.scenario_name,
                scenario.emissions_reduction,
                scenario.cbam_tax_saving,
                scenario.roi_years
            );
        }
    }

    out
}

fn write_totals(out: &mut String, result: &FootprintResult) {
    let _ = writeln!(out, "1. 排放总量");
    let _ = writeln!(out, "----------");
    let _ = writeln!(out, "Scope 1 排放：{} 吨CO₂", result.scope1.total);
    let _ = writeln!(
        out,
        "Scope 2 排放：{} 吨CO₂（{}，置信度 {}）",
        result.scope2.total,
        if result.scope2.use_dynamic {
            "动态电碳因子"
        } else {
            "静态电网因子"
        },
        result.scope2.confidence_level
    );
    let _ = writeln!(out, "总排放量：{} 吨CO₂", result.total_emissions);
    let _ = writeln!(out);
}

fn write_product(out: &mut String, result: &FootprintResult) {
    let production = &result.production_data;
    let _ = writeln!(out, "2. 产品碳足迹");
    let _ = writeln!(out, "----------");
    let _ = writeln!(out, "产品名称：{}", production.product_name);
    let _ = writeln!(out, "产量：{} {}", production.output, production.unit);
    let _ = writeln!(
        out,
        "产品碳足迹：{} 吨CO₂/{}",
        result.product_footprint, production.unit
    );
    let _ = writeln!(out);
}

fn write_cbam(out: &mut String, result: &FootprintResult) {
    let _ = writeln!(out, "3. CBAM税负分析");
    let _ = writeln!(out, "------------");
    match &result.cbam_result {
        Some(cbam) => {
            let _ = writeln!(out, "出口产品：{}", cbam.export_product);
            let _ = writeln!(out, "出口量：{} {}", cbam.export_volume, cbam.export_unit);
            let _ = writeln!(out, "单位税负：{} 欧元", cbam.tax_per_unit_eur);
            let _ = writeln!(out, "预计CBAM税负：{} 欧元", cbam.total_tax_eur);
            let _ = writeln!(out, "预计CBAM税负：{} 元人民币", cbam.total_tax_cny);
        }
        None => {
            let _ = writeln!(out, "无出口数据，未计算 CBAM 税负");
        }
    }
    let _ = writeln!(out);
}
