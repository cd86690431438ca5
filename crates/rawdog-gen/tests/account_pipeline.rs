use rawdog_core::config::RawdogConfig;
use rawdog_core::error::ModelError;
use rawdog_gen::{
    QueryOptions, ScaffoldOptions, synthesize_mocks, synthesize_queries, synthesize_scaffold,
    synthesize_services,
};
use rawdog_parser::{BuildOptions, parse_model};

const ACCOUNT: &str = r#"package domain

import "time"

type Account struct {
	ID        int    `db:"account_id"`
	Name      string `db:"account_name"`
	CreatedAt time.Time
}
"#;

const ORDER: &str = r#"package domain

type Order struct {
	ID          int     `db:"order_id"`
	Customer_id int     `db:"order_customer_id"`
	Total       float64 `db:"order_total"`
	Paid        bool    `db:"order_paid"`
	CreatedAt   time.Time `db:"created_at"`
}

type OrderAugmented struct {
	Order
	CustomerName string `db:"customer_name"`
}
"#;

fn model(source: &str) -> rawdog_core::model::FileModel {
    parse_model(source, &BuildOptions::default()).unwrap()
}

#[test]
fn account_queries_select_and_insert() {
    let config = RawdogConfig::default();
    let text = synthesize_queries(&model(ACCOUNT), &QueryOptions::new("account", &config)).unwrap();
    assert!(text.contains("func (s *AccountRepo) All() ([]domain.Account, error) {"));
    assert!(text.contains("FROM account\n"));
    assert!(text.contains("INSERT INTO account\n\t\t\t(account_name)\n\t\t\tVALUES\n\t\t\t(?)\n"));
    assert!(text.contains("`, item.Name)"));
    assert!(!text.contains("AllAugmented"));
}

#[test]
fn account_queries_are_byte_identical_across_runs() {
    let config = RawdogConfig::default();
    let options = QueryOptions::new("account", &config);
    let first = synthesize_queries(&model(ACCOUNT), &options).unwrap();
    let second = synthesize_queries(&model(ACCOUNT), &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn stripped_columns_reproduce_unprefixed_dialect() {
    let mut config = RawdogConfig::default();
    config.model.strip_table_prefix = true;
    let text = synthesize_queries(&model(ORDER), &QueryOptions::new("order", &config)).unwrap();
    assert!(text.contains("(customer_id, total, paid)\n"));
    assert!(text.contains("ON order.customer_id = customer.id\n"));
    assert!(text.contains("func (s *OrderRepo) ByCustomer_id(customer_id string)"));
}

#[test]
fn augmented_order_emits_join_variants() {
    let config = RawdogConfig::default();
    let text = synthesize_queries(&model(ORDER), &QueryOptions::new("order", &config)).unwrap();
    for method in [
        ") All()",
        ") ByID(",
        ") AllAugmented()",
        ") ByIDAugmented(",
        ") ByCustomer_id(",
        ") ByCustomer_idAugmented(",
        ") Store(",
        ") DeleteByID(",
    ] {
        assert_eq!(text.matches(method).count(), 1, "{method}");
    }
    assert!(text.contains("LEFT JOIN customer\n"));
    assert!(text.contains("result = append(result, *record.toEntityAugmented())"));
}

#[test]
fn duplicate_relations_keep_every_join() {
    let source = r#"package domain

type Transfer struct {
	ID         int `db:"transfer_id"`
	From_id    int `db:"transfer_account_id"`
	To_id      int `db:"transfer_account_id"`
}

type TransferAugmented struct {
	Transfer
}
"#;
    let config = RawdogConfig::default();
    let text = synthesize_queries(&model(source), &QueryOptions::new("transfer", &config)).unwrap();
    assert!(text.contains("SELECT transfer.*, account.*, account.*\n"));

    let mut strict = RawdogConfig::default();
    strict.model.strict = true;
    let err =
        synthesize_queries(&model(source), &QueryOptions::new("transfer", &strict)).unwrap_err();
    let ModelError::DuplicateJoin { entity, joined } = &err else {
        panic!("expected a duplicate join, got {err}");
    };
    assert_eq!((entity.as_str(), joined.as_str()), ("Transfer", "account"));
}

#[test]
fn order_scaffold_mirrors_queries() {
    let config = RawdogConfig::default();
    let text = synthesize_scaffold(&model(ORDER), &ScaffoldOptions::new("order", &config)).unwrap();
    assert!(text.starts_with("package mysqlrepo_test\n"));
    assert!(text.contains("\t\"adapter/mysqlrepo\"\n\t\"domain\"\n"));
    assert!(text.contains(
        "func TestOrderRepo(t *testing.T) {\n\ts := mysqlrepo.NewOrderRepo(sharedDB)\n"
    ));
    assert!(text.contains("assert.Equal(t, allOrder[0].Customer_id, item0.Customer_id)"));
    assert!(
        text.contains("s.ByCustomer_idAugmented(fmt.Sprint(allOrderAugmented[0].Customer_id))")
    );
    assert!(text.contains("\titem.Customer_id = 1\n\titem.Total = 1000.0\n\titem.Paid = false\n"));
    assert!(!text.contains("item.ID ="));
    assert!(text.contains("err = s.DeleteByID(fmt.Sprint(newOrder.ID))"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn mocks_from_interface_file() {
    let source = r"package store

type WidgetStore interface {
	Get(id string) (*Widget, error)
	Put(Widget) error
}

type Empty interface{}
";
    let text = synthesize_mocks(&model(source));
    assert!(text.contains("GetCallback func(id string) (*store.Widget, error)"));
    assert!(text.contains("func (m *MockWidgetStore) Put(arg0 store.Widget) error {"));
    assert!(text.contains("\treturn nil, nil\n"));
    assert!(!text.contains("MockEmpty"));
}

#[test]
fn services_from_receiver_methods() {
    let source = r"package logic

func (s *AccountService) All() ([]Account, error) { return nil, nil }
func (s *AccountService) Store(item *Account) (*Account, error) { return item, nil }
";
    let m = model(source);
    let text = synthesize_services(&m, "domain").unwrap();
    assert!(text.starts_with("package domain\n"));
    assert!(text.contains("\tStore(item *Account) (*Account, error)\n"));
    assert!(text.contains("\treturn s.repo.Store(item)\n"));
    assert!(!text.contains("domain.Account"));
}
