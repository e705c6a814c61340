//! Formatters for DATEV master and accounting data
//!
//! One line per match, fields joined with ` | `, relevance annotation last.

use super::format_date;
use super::format_money;
use super::format_number;
use super::non_empty;
use super::pipe_line;
use super::DEFAULT_CURRENCY;
use crate::models::AddresseeType;
use crate::models::ClientType;
use crate::models::DatevAddressee;
use crate::models::DatevClient;
use crate::models::DatevCorporateTax;
use crate::models::DatevEmployee;
use crate::models::DatevOrder;
use crate::models::DatevOrderAnalytics;
use crate::models::DatevTradeTax;
use crate::models::Scored;

fn lines<T>(matches: &[Scored<T>], format_fields: impl Fn(&T) -> Vec<String>) -> String {
    matches
        .iter()
        .map(|m| pipe_line(&format_fields(&m.record), m.similarity))
        .collect::<Vec<_>>()
        .join("\n")
}

fn currency(value: Option<&String>) -> &str {
    non_empty(value).unwrap_or(DEFAULT_CURRENCY)
}

pub fn format_datev_clients(matches: &[Scored<DatevClient>]) -> String {
    lines(matches, |client| {
        let mut parts = vec![client.client_name.clone()];

        if let Some(number) = client.client_number {
            parts.push(format!("Mandantennr. {number}"));
        }
        if let Some(label) = client.client_type.and_then(|t| ClientType::from(t).label()) {
            parts.push(label.to_string());
        }
        if let Some(legal_form) = non_empty(client.legal_form.as_ref()) {
            parts.push(format!("Rechtsform: {legal_form}"));
        }
        if let Some(status) = non_empty(client.status.as_ref()) {
            parts.push(format!("Status: {status}"));
        }

        let director: Vec<&str> = [
            &client.managing_director_name,
            &client.managing_director_email,
            &client.managing_director_phone,
        ]
        .into_iter()
        .filter_map(|field| non_empty(field.as_ref()))
        .collect();
        if !director.is_empty() {
            parts.push(format!("Geschäftsführer: {}", director.join(", ")));
        }

        parts
    })
}

pub fn format_datev_addressees(matches: &[Scored<DatevAddressee>]) -> String {
    lines(matches, |addressee| {
        let mut parts = vec![addressee.addressee_name.clone()];

        if let Some(label) = addressee
            .addressee_type
            .and_then(|t| AddresseeType::from(t).label())
        {
            parts.push(label.to_string());
        }
        if addressee.is_legal_representative_of_company == Some(true) {
            parts.push("Geschäftsführer".to_string());
        }
        if let Some(function) = non_empty(addressee.function.as_ref()) {
            parts.push(format!("Funktion: {function}"));
        }
        if let Some(email) = non_empty(addressee.email.as_ref()) {
            parts.push(format!("E-Mail: {email}"));
        }
        if let Some(phone) = non_empty(addressee.phone.as_ref()) {
            parts.push(format!("Tel.: {phone}"));
        }

        parts
    })
}

pub fn format_datev_orders(matches: &[Scored<DatevOrder>]) -> String {
    lines(matches, |order| {
        let mut parts = vec![order.order_name.clone()];

        if let Some(number) = order.order_number {
            parts.push(format!("Auftragsnr. {number}"));
        }
        if let Some(order_type) = non_empty(order.order_type.as_ref()) {
            parts.push(format!("Art: {order_type}"));
        }
        if let Some(year) = order.fiscal_year {
            parts.push(format!("Jahr: {year}"));
        }
        if let Some(status) = non_empty(order.status.as_ref()) {
            parts.push(format!("Status: {status}"));
        }
        if let Some(due) = order.due_date {
            parts.push(format!("Fällig: {}", format_date(due)));
        }
        if let Some(completed) = order.completion_date {
            parts.push(format!("Erledigt: {}", format_date(completed)));
        }

        parts
    })
}

pub fn format_datev_corporate_tax(matches: &[Scored<DatevCorporateTax>]) -> String {
    lines(matches, |filing| {
        let cur = currency(filing.currency.as_ref());
        let mut parts = vec![format!("Körperschaftsteuer {}", filing.fiscal_year)];

        if let Some(name) = non_empty(filing.client_name.as_ref()) {
            parts.push(name.to_string());
        }
        if let Some(status) = non_empty(filing.status.as_ref()) {
            parts.push(format!("Status: {status}"));
        }
        if let Some(income) = filing.taxable_income {
            parts.push(format!("zu versteuerndes Einkommen: {}", format_money(income, cur)));
        }
        if let Some(tax) = filing.corporate_tax {
            parts.push(format!("KSt: {}", format_money(tax, cur)));
        }
        if let Some(soli) = filing.solidarity_surcharge {
            parts.push(format!("SolZ: {}", format_money(soli, cur)));
        }
        if let Some(submitted) = filing.submission_date {
            parts.push(format!("Eingereicht: {}", format_date(submitted)));
        }

        parts
    })
}

pub fn format_datev_trade_tax(matches: &[Scored<DatevTradeTax>]) -> String {
    lines(matches, |filing| {
        let cur = currency(filing.currency.as_ref());
        let mut parts = vec![format!("Gewerbesteuer {}", filing.fiscal_year)];

        if let Some(name) = non_empty(filing.client_name.as_ref()) {
            parts.push(name.to_string());
        }
        if let Some(status) = non_empty(filing.status.as_ref()) {
            parts.push(format!("Status: {status}"));
        }
        if let Some(municipality) = non_empty(filing.municipality.as_ref()) {
            parts.push(format!("Gemeinde: {municipality}"));
        }
        if let Some(rate) = filing.assessment_rate {
            parts.push(format!("Hebesatz: {rate}%"));
        }
        if let Some(income) = filing.trade_income {
            parts.push(format!("Gewerbeertrag: {}", format_money(income, cur)));
        }
        if let Some(tax) = filing.trade_tax {
            parts.push(format!("GewSt: {}", format_money(tax, cur)));
        }

        parts
    })
}

pub fn format_datev_analytics(matches: &[Scored<DatevOrderAnalytics>]) -> String {
    lines(matches, |analytics| {
        let cur = currency(analytics.currency.as_ref());
        let name = non_empty(analytics.client_name.as_ref()).unwrap_or("Mandant");
        let mut parts = vec![name.to_string()];

        if let Some(year) = analytics.fiscal_year {
            parts.push(format!("Jahr: {year}"));
        }
        parts.push(format!("Aufträge: {}", analytics.order_count));
        parts.push(format!(
            "Auftragswert: {}",
            format_money(analytics.order_value, cur)
        ));
        parts.push(format!(
            "Ø Auftragswert: {}",
            format_money(analytics.average_order_value(), cur)
        ));

        parts
    })
}

pub fn format_datev_employees(matches: &[Scored<DatevEmployee>]) -> String {
    lines(matches, |employee| {
        let mut parts = vec![employee.full_name()];

        if let Some(number) = employee.personnel_number {
            parts.push(format!("Personalnr. {number}"));
        }
        if let Some(job_title) = non_empty(employee.job_title.as_ref()) {
            parts.push(job_title.to_string());
        }
        if let Some(department) = non_empty(employee.department.as_ref()) {
            parts.push(format!("Abteilung: {department}"));
        }
        if let Some(joined) = employee.date_of_joining {
            parts.push(format!("Eintritt: {}", format_date(joined)));
        }
        if let Some(hours) = employee.weekly_working_hours {
            parts.push(format!("Wochenstunden: {}", format_number(hours)));
        }
        if let Some(salary) = employee.gross_salary {
            parts.push(format!(
                "Bruttogehalt: {}",
                format_money(salary, currency(employee.currency.as_ref()))
            ));
        }

        parts
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn client(name: &str) -> DatevClient {
        DatevClient {
            id: "c-1".to_string(),
            client_name: name.to_string(),
            client_number: None,
            client_type: None,
            legal_form: None,
            status: None,
            managing_director_name: None,
            managing_director_email: None,
            managing_director_phone: None,
        }
    }

    fn analytics(order_count: i64, order_value: &str) -> DatevOrderAnalytics {
        DatevOrderAnalytics {
            id: "a-1".to_string(),
            client_id: Some("c-1".to_string()),
            client_name: Some("Mustermann GmbH".to_string()),
            fiscal_year: Some(2024),
            order_count,
            order_value: dec(order_value),
            currency: None,
        }
    }

    #[test]
    fn test_client_line_with_all_fields() {
        let mut record = client("Mustermann GmbH");
        record.client_number = Some(10_001);
        record.client_type = Some(3);
        record.legal_form = Some("GmbH".to_string());
        record.status = Some("aktiv".to_string());
        record.managing_director_name = Some("Max Mustermann".to_string());
        record.managing_director_email = Some("max@mustermann.de".to_string());
        record.managing_director_phone = Some("+49 89 123456".to_string());

        assert_eq!(
            format_datev_clients(&[Scored::new(record, 0.91)]),
            "Mustermann GmbH | Mandantennr. 10001 | Juristische Person | Rechtsform: GmbH | Status: aktiv | Geschäftsführer: Max Mustermann, max@mustermann.de, +49 89 123456 (91% relevant)"
        );
    }

    #[test]
    fn test_client_line_skips_missing_fields() {
        let mut record = client("Erika Musterfrau");
        record.client_type = Some(1);
        record.managing_director_email = Some(String::new());

        assert_eq!(
            format_datev_clients(&[Scored::new(record, 0.4)]),
            "Erika Musterfrau | Natürliche Person (40% relevant)"
        );
    }

    #[test]
    fn test_sole_proprietorship_label() {
        let mut record = client("Bäckerei Huber");
        record.client_type = Some(2);
        assert!(format_datev_clients(&[Scored::new(record, 0.5)]).contains("Einzelunternehmen"));
    }

    #[test]
    fn test_addressee_legal_representative_tag() {
        let addressee = DatevAddressee {
            id: "ad-1".to_string(),
            client_id: Some("c-1".to_string()),
            addressee_name: "Max Mustermann".to_string(),
            addressee_type: Some(1),
            email: Some("max@mustermann.de".to_string()),
            phone: None,
            function: None,
            is_legal_representative_of_company: Some(true),
        };
        assert_eq!(
            format_datev_addressees(&[Scored::new(addressee, 0.55)]),
            "Max Mustermann | Natürliche Person | Geschäftsführer | E-Mail: max@mustermann.de (55% relevant)"
        );
    }

    #[test]
    fn test_orders_one_line_per_match() {
        let order = |name: &str| DatevOrder {
            id: name.to_string(),
            client_id: None,
            order_name: name.to_string(),
            order_number: Some(42),
            order_type: Some("Jahresabschluss".to_string()),
            fiscal_year: Some(2023),
            status: Some("in Bearbeitung".to_string()),
            due_date: NaiveDate::from_ymd_opt(2024, 7, 31),
            completion_date: None,
        };
        let text = format_datev_orders(&[
            Scored::new(order("JA 2023"), 0.7),
            Scored::new(order("USt 2023"), 0.6),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "JA 2023 | Auftragsnr. 42 | Art: Jahresabschluss | Jahr: 2023 | Status: in Bearbeitung | Fällig: 31.07.2024 (70% relevant)"
        );
    }

    #[test]
    fn test_corporate_tax_money_format() {
        let filing = DatevCorporateTax {
            id: "k-1".to_string(),
            client_id: None,
            client_name: Some("Mustermann GmbH".to_string()),
            fiscal_year: 2023,
            status: None,
            taxable_income: Some(dec("125000")),
            corporate_tax: Some(dec("18750")),
            solidarity_surcharge: Some(dec("1031.25")),
            submission_date: None,
            currency: None,
        };
        assert_eq!(
            format_datev_corporate_tax(&[Scored::new(filing, 0.33)]),
            "Körperschaftsteuer 2023 | Mustermann GmbH | zu versteuerndes Einkommen: 125.000,00 EUR | KSt: 18.750,00 EUR | SolZ: 1.031,25 EUR (33% relevant)"
        );
    }

    #[test]
    fn test_trade_tax_line() {
        let filing = DatevTradeTax {
            id: "g-1".to_string(),
            client_id: None,
            client_name: None,
            fiscal_year: 2022,
            status: Some("veranlagt".to_string()),
            municipality: Some("München".to_string()),
            assessment_rate: Some(490),
            trade_income: Some(dec("80000")),
            trade_tax: Some(dec("13720")),
            currency: Some("EUR".to_string()),
        };
        assert_eq!(
            format_datev_trade_tax(&[Scored::new(filing, 0.48)]),
            "Gewerbesteuer 2022 | Status: veranlagt | Gemeinde: München | Hebesatz: 490% | Gewerbeertrag: 80.000,00 EUR | GewSt: 13.720,00 EUR (48% relevant)"
        );
    }

    #[test]
    fn test_analytics_average_value() {
        assert_eq!(
            format_datev_analytics(&[Scored::new(analytics(3, "4500"), 0.6)]),
            "Mustermann GmbH | Jahr: 2024 | Aufträge: 3 | Auftragswert: 4.500,00 EUR | Ø Auftragswert: 1.500,00 EUR (60% relevant)"
        );
    }

    #[test]
    fn test_analytics_zero_orders_average_is_zero() {
        let text = format_datev_analytics(&[Scored::new(analytics(0, "0"), 0.6)]);
        assert!(text.contains("Ø Auftragswert: 0,00 EUR"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_employee_line() {
        let employee = DatevEmployee {
            id: "e-1".to_string(),
            client_id: Some("c-1".to_string()),
            first_name: Some("Erika".to_string()),
            surname: "Musterfrau".to_string(),
            personnel_number: Some(17),
            job_title: Some("Buchhalterin".to_string()),
            department: Some("Finanzen".to_string()),
            date_of_joining: NaiveDate::from_ymd_opt(2019, 4, 1),
            weekly_working_hours: Some(dec("38.5")),
            gross_salary: Some(dec("4200")),
            currency: None,
        };
        assert_eq!(
            format_datev_employees(&[Scored::new(employee, 0.52)]),
            "Erika Musterfrau | Personalnr. 17 | Buchhalterin | Abteilung: Finanzen | Eintritt: 01.04.2019 | Wochenstunden: 38,5 | Bruttogehalt: 4.200,00 EUR (52% relevant)"
        );
    }

    #[test]
    fn test_empty_match_list_formats_to_empty_string() {
        assert_eq!(format_datev_clients(&[]), "");
        assert_eq!(format_datev_analytics(&[]), "");
    }
}
