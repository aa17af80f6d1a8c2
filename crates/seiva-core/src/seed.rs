//! Demonstration records used until a persisted snapshot replaces them.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use seiva_domain::{
    AcademicRecord, BankDetails, CalendarEvent, ContractType, Department, EmergencyContact,
    Employee, EmployeeDocuments, EmploymentStatus, EventCategory, FinancialResponsible, Gender,
    Grade, Guardians, HealthRecord, Parent, PaymentMethod, PayrollEntry, PayrollStatus,
    PersonalDetails, Student, Transaction, TransactionKind, TransactionStatus, ACADEMIC_MONTHS,
};

use crate::storage::SchoolSnapshot;

pub fn seed_snapshot(year: i32) -> SchoolSnapshot {
    SchoolSnapshot {
        students: seed_students(),
        transactions: seed_transactions(),
        events: seed_events(year),
        employees: seed_employees(),
        payroll: seed_payroll(),
    }
}

pub fn seed_students() -> Vec<Student> {
    vec![
        seed_student(
            ("1", "Cleyton Muianga", "cleyton", "#2023-101", Grade::Sixth, 0.0),
            9,
            PersonalDetails {
                dob: ymd(2012, 5, 14),
                gender: Gender::M,
                nationality: "Moçambicana".into(),
                bi_number: "11029384B".into(),
                address: "Av. Julius Nyerere, Polana".into(),
                city: "Maputo".into(),
            },
            academic(ymd(2023, 1, 15), "Escola Primária da Polana", &["Certificado", "Fotos", "BI"]),
            guardians(
                parent("Paulo Muianga", "+258 84 123 4567", "paulo@email.com", "Engenheiro"),
                parent("Ana Muianga", "+258 82 987 6543", "ana@email.com", "Médica"),
            ),
            HealthRecord {
                blood_type: "O+".into(),
                allergies: "Nenhuma".into(),
                conditions: String::new(),
                notes: "Aluno com excelente desempenho em Matemática.".into(),
            },
        ),
        seed_student(
            ("2", "Neyma Sousa", "neyma", "#2023-102", Grade::Fifth, -2500.0),
            7,
            PersonalDetails {
                dob: ymd(2013, 8, 22),
                gender: Gender::F,
                nationality: "Moçambicana".into(),
                bi_number: "55029384C".into(),
                address: "Bairro do Triunfo".into(),
                city: "Maputo".into(),
            },
            academic(ymd(2023, 1, 20), "Escola Primária 3 de Fevereiro", &["Fotos", "BI"]),
            guardians(
                parent("Carlos Sousa", "+258 84 555 0000", "carlos@email.com", "Advogado"),
                parent("Marta Sousa", "+258 82 444 1111", "marta@email.com", "Gestora"),
            ),
            HealthRecord {
                blood_type: "A+".into(),
                allergies: "Amendoim".into(),
                conditions: "Asma leve".into(),
                notes: "Necessita de bombinha em atividades físicas intensas.".into(),
            },
        ),
        seed_student(
            ("3", "Almiro Lobo", "almiro", "#2023-145", Grade::Fourth, 0.0),
            8,
            PersonalDetails {
                dob: ymd(2014, 2, 10),
                gender: Gender::M,
                nationality: "Moçambicana".into(),
                bi_number: "99887766A".into(),
                address: "Matola Rio".into(),
                city: "Matola".into(),
            },
            academic(ymd(2023, 2, 1), "Colégio Kitabu", &["Certificado"]),
            guardians(
                parent("João Lobo", "+258 85 222 3333", "joao@email.com", "Comerciante"),
                parent("Luísa Lobo", "+258 84 111 2222", "luisa@email.com", "Doméstica"),
            ),
            HealthRecord {
                blood_type: "B-".into(),
                ..HealthRecord::default()
            },
        ),
    ]
}

pub fn seed_transactions() -> Vec<Transaction> {
    use PaymentMethod::*;
    use TransactionKind::*;

    let rows = [
        ("1", (2023, 10, 25), "Mensalidade - Cleyton Muianga", "Mensalidade", Income, 5000.0, MPesa),
        ("2", (2023, 10, 24), "Pagamento Internet (TV Cabo)", "Internet", Expense, 3500.0, BankTransfer),
        ("3", (2023, 10, 24), "Compra de Material de Limpeza", "Material de Limpeza", Expense, 1200.0, Cash),
        ("4", (2023, 10, 23), "Mensalidade - Neyma Sousa", "Mensalidade", Income, 5000.0, EMola),
        ("5", (2023, 10, 23), "Venda de Uniforme (Kit Desportivo)", "Uniforme", Income, 2500.0, Pos),
        ("6", (2023, 10, 20), "Adiantamento Salarial - Prof. João", "Salários", Expense, 10000.0, BankTransfer),
        ("7", (2023, 10, 20), "Mensalidade - Almiro Lobo", "Mensalidade", Income, 5000.0, MPesa),
        ("8", (2023, 9, 15), "Mensalidade - Setembro", "Mensalidade", Income, 15000.0, Pos),
        ("9", (2023, 9, 10), "Manutenção Geral", "Manutenção", Expense, 5000.0, Cash),
    ];

    rows.into_iter()
        .filter_map(|(id, (y, m, d), description, category, kind, amount, method)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            let status = if id == "7" {
                TransactionStatus::Pending
            } else {
                TransactionStatus::Completed
            };
            Some(
                Transaction::new(kind, amount, date)
                    .with_id(id)
                    .with_description(description)
                    .with_category(category)
                    .with_method(method)
                    .with_status(status),
            )
        })
        .collect()
}

/// Agenda for `year`: two October holidays, the term exams and a parents' meeting.
pub fn seed_events(year: i32) -> Vec<CalendarEvent> {
    let rows = [
        ("1", "Dia da Paz", (10, 4, 8), (10, 4, 18), EventCategory::Holiday, None),
        ("2", "Dia dos Professores", (10, 12, 8), (10, 12, 17), EventCategory::Holiday, None),
        ("3", "Exames Trimestrais", (10, 25, 8), (10, 29, 12), EventCategory::Academic, None),
        (
            "4",
            "Reunião de Pais",
            (11, 5, 14),
            (11, 5, 16),
            EventCategory::Administrative,
            Some("Auditório Principal"),
        ),
    ];

    rows.into_iter()
        .filter_map(|(id, title, start, end, category, location)| {
            let mut event =
                CalendarEvent::new(title, at(year, start)?, at(year, end)?, category).with_id(id);
            event.location = location.map(str::to_string);
            Some(event)
        })
        .collect()
}

pub fn seed_employees() -> Vec<Employee> {
    use ContractType::*;
    use Department::*;

    let rows = [
        ("1", "Ricardo Mendes", "Diretor Pedagógico", Management, 65000.0, "ricardo", "+258 84 123 4567", FullTime, (2020, 1, 10), EmploymentStatus::Active, ("11001100B", "123456789", (1985, 5, 20)), ("Millennium Bim", "12345678", "0001...")),
        ("2", "Fátima Têmbue", "Prof. Português", Teaching, 25000.0, "fatima", "+258 82 987 6543", FullTime, (2021, 2, 15), EmploymentStatus::Active, ("22002200C", "987654321", (1990, 8, 12)), ("BCI", "87654321", "0008...")),
        ("3", "João Macuácua", "Segurança", Security, 12000.0, "joao", "+258 86 111 2222", Contractor, (2022, 6, 1), EmploymentStatus::Active, ("33003300D", "456123789", (1980, 3, 30)), ("Standard Bank", "11223344", "0003...")),
        ("4", "Carla Dias", "Secretária", Administrative, 18000.0, "carla", "+258 84 555 6666", FullTime, (2021, 8, 1), EmploymentStatus::Vacation, ("44004400E", "789456123", (1995, 11, 15)), ("Absa", "99887766", "0002...")),
    ];

    rows.into_iter()
        .map(
            |(
                id,
                name,
                role,
                department,
                salary,
                slug,
                phone,
                contract,
                (ay, am, ad),
                status,
                (bi, nuit, (by, bm, bd)),
                (bank_name, account, nib),
            )| {
                let mut employee = Employee::new(id, name, role, department, salary);
                employee.email = format!("{slug}.{}@seiva.mz", initial(name));
                employee.phone = phone.into();
                employee.avatar = format!("https://picsum.photos/seed/{slug}/100/100");
                employee.contract_type = contract;
                employee.admission_date = ymd(ay, am, ad);
                employee.status = status;
                employee.personal = EmployeeDocuments {
                    bi_number: bi.into(),
                    nuit: nuit.into(),
                    dob: ymd(by, bm, bd),
                };
                employee.bank = BankDetails {
                    bank_name: bank_name.into(),
                    account_number: account.into(),
                    nib: nib.into(),
                };
                employee
            },
        )
        .collect()
}

/// October payroll for the seeded staff: two paid, one processing, one pending.
pub fn seed_payroll() -> Vec<PayrollEntry> {
    let rows = [
        ("p1", "1", "Ricardo Mendes", "Diretor", 65000.0, 5000.0, 15400.0, PayrollStatus::Paid),
        ("p2", "2", "Fátima Têmbue", "Docente", 25000.0, 2000.0, 4500.0, PayrollStatus::Paid),
        ("p3", "3", "João Macuácua", "Segurança", 12000.0, 500.0, 900.0, PayrollStatus::Processing),
        ("p4", "4", "Carla Dias", "Secretária", 18000.0, 0.0, 3200.0, PayrollStatus::Pending),
    ];

    rows.into_iter()
        .map(
            |(id, employee_id, name, role, base, bonuses, deductions, status)| PayrollEntry {
                id: id.into(),
                employee_id: employee_id.into(),
                employee_name: name.into(),
                employee_role: role.into(),
                month_reference: "Outubro 2023".into(),
                base_salary: base,
                bonuses,
                deductions,
                status,
                payment_date: None,
            },
        )
        .collect()
}

fn seed_student(
    (id, name, slug, enrollment_id, grade, balance): (&str, &str, &str, &str, Grade, f64),
    months_paid: usize,
    personal: PersonalDetails,
    academic: AcademicRecord,
    guardians: Guardians,
    health: HealthRecord,
) -> Student {
    let mut student = Student::new(id, name, grade)
        .with_paid_months(ACADEMIC_MONTHS.iter().take(months_paid).copied());
    student.email = format!("{slug}.{}@student.seiva.mz", initial(name));
    student.avatar = format!("https://picsum.photos/seed/{slug}/100/100");
    student.enrollment_id = enrollment_id.into();
    student.balance = balance;
    student.personal = personal;
    student.academic = academic;
    student.guardians = guardians;
    student.health = health;
    student
}

fn initial(name: &str) -> String {
    name.split_whitespace()
        .last()
        .and_then(|surname| surname.chars().next())
        .map(|c| c.to_lowercase().to_string())
        .unwrap_or_default()
}

fn academic(enrollment_date: Option<NaiveDate>, prev_school: &str, docs: &[&str]) -> AcademicRecord {
    AcademicRecord {
        enrollment_date,
        prev_school: prev_school.into(),
        submitted_docs: docs.iter().map(|doc| doc.to_string()).collect(),
    }
}

fn parent(name: &str, phone: &str, email: &str, profession: &str) -> Parent {
    Parent {
        name: name.into(),
        phone: phone.into(),
        email: email.into(),
        profession: profession.into(),
    }
}

fn guardians(father: Parent, mother: Parent) -> Guardians {
    Guardians {
        emergency: EmergencyContact {
            name: father.name.clone(),
            relation: "Pai".into(),
            phone: father.phone.clone(),
        },
        father,
        mother,
        financial_responsible: FinancialResponsible::Father,
    }
}

fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn at(year: i32, (month, day, hour): (u32, u32, u32)) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).single()
}
