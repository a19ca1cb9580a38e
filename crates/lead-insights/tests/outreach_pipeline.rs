use chrono::NaiveDate;
use lead_insights::workflows::outreach::{
    report::generate_insights, DashboardView, LeadLoader, LeadReport, LeadTable, LoadErrorKind,
};
use std::io::Cursor;

const HEADER: &str = "DATA_ABORDAGEM,SEGMENTO,CANAL,RESULTADO\n";

fn table_from_rows(rows: &[&str]) -> LeadTable {
    let mut csv = String::from(HEADER);
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    LeadLoader::new()
        .load_csv("inline.csv", Cursor::new(csv))
        .expect("csv loads")
}

#[test]
fn leads_today_counts_the_most_recent_day() {
    let table = table_from_rows(&[
        "2025-05-02 09:00,VAREJO,EMAIL,POSITIVO",
        "2025-05-01 09:00,VAREJO,EMAIL,POSITIVO",
        "2025-05-02 10:00,SAUDE,EMAIL,NEGATIVO",
        "2025-05-01 11:00,SAUDE,WHATSAPP,NÃO RESPONDEU",
        "2025-05-02 12:00,SAUDE,WHATSAPP,INTERESSADO",
        "2025-05-02 13:00,VAREJO,LIGACAO,NÃO RESPONDEU",
        "2025-05-01 14:00,VAREJO,LIGACAO,POSITIVO",
        "2025-05-02 15:00,INDUSTRIA,EMAIL,VISUALIZOU E NÃO RESPONDEU",
    ]);

    let report = LeadReport::build(&table);
    assert_eq!(report.total_leads, 8);
    assert_eq!(report.latest_day, NaiveDate::from_ymd_opt(2025, 5, 2));
    assert_eq!(report.leads_today, 5);
}

#[test]
fn all_no_response_rows_zero_every_return_rate() {
    let table = table_from_rows(&[
        "2025-05-01,VAREJO,EMAIL,Não respondeu",
        "2025-05-01,SAUDE,WHATSAPP, não respondeu ",
        "2025-05-02,SAUDE,LIGACAO,NÃO RESPONDEU",
    ]);

    let report = LeadReport::build(&table);
    assert_eq!(report.channel_stats.len(), 3);
    assert!(report
        .channel_stats
        .iter()
        .all(|stat| stat.return_rate == 0.0 && stat.positive_rate == 0.0));
    assert_eq!(report.total_no_response, 3);
    assert_eq!(report.percent_no_response, 100.0);
}

#[test]
fn empty_table_yields_empty_aggregates_without_fault() {
    let table = table_from_rows(&[]);
    assert!(table.is_empty());

    let report = LeadReport::build(&table);
    assert_eq!(report.total_leads, 0);
    assert_eq!(report.leads_today, 0);
    assert!(report.latest_day.is_none());
    assert!(report.leads_by_day.is_empty());
    assert!(report.leads_by_month.is_empty());
    assert!(report.channel_stats.is_empty());
    assert!(report.segment_no_response.is_empty());
    assert_eq!(report.total_no_response, 0);
    assert_eq!(report.percent_no_response, 0.0);
    assert!(report.mean_return_rate().is_none());
    assert!(!report.insights().is_sufficient());
}

#[test]
fn insight_selects_most_efficient_channel() {
    let mut rows = Vec::new();
    for outcome in ["POSITIVO", "NEGATIVO", "INTERESSADO", "POSITIVO", "NÃO RESPONDEU"] {
        rows.push(format!("2025-05-01,VAREJO,WHATSAPP,{outcome}"));
    }
    for outcome in ["POSITIVO", "NEGATIVO", "AGUARDANDO", "NÃO RESPONDEU", "NÃO RESPONDEU"] {
        rows.push(format!("2025-05-01,SAUDE,EMAIL,{outcome}"));
    }
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let report = LeadReport::build(&table_from_rows(&rows));

    let rates: Vec<(&str, f64)> = report
        .channel_stats
        .iter()
        .map(|stat| (stat.channel.as_str(), stat.return_rate))
        .collect();
    assert_eq!(rates, vec![("EMAIL", 60.0), ("WHATSAPP", 80.0)]);

    let insights = generate_insights(&report.channel_stats, &report.segment_no_response);
    let best = insights.most_efficient_channel.expect("best channel");
    assert_eq!(best.channel, "WHATSAPP");
    assert_eq!(best.return_rate, 80.0);

    let worst = insights.most_unresponsive_segment.expect("worst segment");
    assert_eq!(worst.segment, "SAUDE");
    assert_eq!(worst.no_response, 2);
}

#[test]
fn unparseable_timestamps_are_excluded_everywhere() {
    let table = table_from_rows(&[
        "2025-05-01,VAREJO,EMAIL,NÃO RESPONDEU",
        "amanhã,VAREJO,EMAIL,NÃO RESPONDEU",
        ",SAUDE,SMS,POSITIVO",
        "2025-05-02,SAUDE,EMAIL,POSITIVO",
    ]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped_rows(), 2);

    let report = LeadReport::build(&table);
    assert_eq!(report.total_leads, 2);
    assert_eq!(report.total_no_response, 1);
    assert_eq!(report.percent_no_response, 50.0);
    assert!(report.channel_stats.iter().all(|stat| stat.channel != "SMS"));
    let email = &report.channel_stats[0];
    assert_eq!(email.total_leads, 2);
    assert_eq!(
        report.leads_by_day.iter().map(|d| d.leads).sum::<usize>(),
        2
    );
}

#[test]
fn channel_stats_count_each_outcome_family() {
    let table = table_from_rows(&[
        "2025-05-01,VAREJO,EMAIL,POSITIVO",
        "2025-05-01,VAREJO,EMAIL,RESPONDEU E MARCOU CALL",
        "2025-05-01,VAREJO,EMAIL,NEGATIVO",
        "2025-05-01,VAREJO,EMAIL,VISUALIZOU E NÃO RESPONDEU",
        "2025-05-01,VAREJO,EMAIL,AGUARDANDO",
        "2025-05-01,VAREJO,EMAIL,NÃO RESPONDEU",
    ]);
    let report = LeadReport::build(&table);
    let email = &report.channel_stats[0];

    assert_eq!(email.total_leads, 6);
    assert_eq!(email.no_response, 2);
    assert_eq!(email.with_return, 4);
    assert_eq!(email.negative_responses, 1);
    assert_eq!(email.positive_responses, 2);
    assert_eq!(email.effective_responses, 3);
    assert_eq!(email.return_rate, 66.7);
    assert_eq!(email.positive_rate, 33.3);
}

#[test]
fn periods_are_sorted_regardless_of_row_order() {
    let table = table_from_rows(&[
        "2025-06-03,VAREJO,EMAIL,POSITIVO",
        "2025-04-30,VAREJO,EMAIL,POSITIVO",
        "2025-06-01,VAREJO,EMAIL,POSITIVO",
        "2025-04-30,VAREJO,EMAIL,POSITIVO",
        "2025-05-15,VAREJO,EMAIL,POSITIVO",
    ]);
    let report = LeadReport::build(&table);

    let days: Vec<NaiveDate> = report.leads_by_day.iter().map(|entry| entry.day).collect();
    let mut sorted = days.clone();
    sorted.sort();
    assert_eq!(days, sorted);
    assert_eq!(report.leads_by_day[0].leads, 2);
    assert_eq!(report.leads_by_day[0].label, "30/04");

    let months: Vec<String> = report
        .leads_by_month
        .iter()
        .map(|entry| format!("{}={}", entry.month, entry.leads))
        .collect();
    assert_eq!(months, vec!["2025-04=2", "2025-05=1", "2025-06=2"]);
}

#[test]
fn percent_no_response_stays_within_bounds() {
    let samples: [&[&str]; 3] = [
        &["2025-05-01,VAREJO,EMAIL,NÃO RESPONDEU"],
        &["2025-05-01,VAREJO,EMAIL,POSITIVO"],
        &[
            "2025-05-01,VAREJO,EMAIL,NÃO RESPONDEU",
            "2025-05-01,VAREJO,EMAIL,NEGATIVO",
            "2025-05-01,VAREJO,EMAIL,AGUARDANDO",
        ],
    ];

    for rows in samples {
        let report = LeadReport::build(&table_from_rows(rows));
        assert!((0.0..=100.0).contains(&report.percent_no_response));
    }
}

#[test]
fn repeated_loads_classify_identically() {
    let rows = [
        "2025-05-01, varejo ,Email,positivo",
        "2025-05-02,Saude,email,Visualizou e não respondeu",
    ];
    let first = table_from_rows(&rows);
    let second = table_from_rows(&rows);
    assert_eq!(first, second);

    let flags: Vec<(bool, bool, bool)> = first
        .records()
        .iter()
        .map(|r| (r.had_return(), r.positive_response(), r.effective_response()))
        .collect();
    assert_eq!(flags, vec![(true, true, true), (false, false, false)]);
}

#[test]
fn csv_files_load_from_disk_and_missing_files_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("leads.csv");
    std::fs::write(
        &path,
        format!("{HEADER}2025-05-01,VAREJO,EMAIL,POSITIVO\n2025-05-01,VAREJO,SMS,NEGATIVO\n"),
    )
    .expect("write csv");

    let table = LeadLoader::new().load(&path).expect("file loads");
    assert_eq!(table.len(), 2);
    assert_eq!(table.source(), path.as_path());

    let error = LeadLoader::new()
        .load(dir.path().join("dashboard_rank.xlsx"))
        .expect_err("workbook absent");
    assert_eq!(error.kind(), LoadErrorKind::MissingFile);
    assert!(LeadLoader::new()
        .load_or_report(dir.path().join("dashboard_rank.xlsx"))
        .is_none());
}

#[test]
fn dashboard_view_carries_report_and_insight() {
    let table = table_from_rows(&[
        "2025-05-01,VAREJO,EMAIL,POSITIVO",
        "2025-05-02,VAREJO,EMAIL,NÃO RESPONDEU",
        "not a date,VAREJO,EMAIL,NÃO RESPONDEU",
    ]);
    let view = DashboardView::build(Some(&table));

    assert!(view.is_available());
    assert_eq!(view.dropped_rows, 1);
    let insights = view.insights.expect("insights");
    assert_eq!(insights.lines.len(), 3);
    assert!(insights.message().contains("EMAIL with 50.0% return rate"));
    assert!(insights.message().contains("VAREJO (1 leads without response)"));
}
