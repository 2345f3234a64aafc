//! End-to-end tests for tables over an in-memory SQLite database.

use dodotable_lib::Error;
use dodotable_lib::Table;
use dodotable_lib::filter::Choice;
use dodotable_lib::filter::ChoiceFilter;
use dodotable_lib::filter::CombinedSubstringFilter;
use dodotable_lib::filter::EqualityFilter;
use dodotable_lib::filter::SubstringAlias;
use dodotable_lib::filter::SubstringFilter;
use dodotable_lib::filter::ValueType;
use dodotable_lib::model::Entity;
use dodotable_lib::model::RequestParams;
use dodotable_lib::model::Value;
use dodotable_lib::query::Alias;
use dodotable_lib::query::Direction;
use dodotable_lib::query::Expr;
use dodotable_lib::source::SqliteSource;
use dodotable_lib::table::Column;
use dodotable_lib::table::Endpoint;
use dodotable_lib::table::TableDefinition;

const SCHEMA: &str = "
    CREATE TABLE artist (id INTEGER PRIMARY KEY, first TEXT, last TEXT);
    CREATE TABLE music_album (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        year INTEGER,
        genre TEXT,
        artist_id INTEGER REFERENCES artist(id)
    );
    INSERT INTO artist VALUES (1, 'John', 'Coltrane'), (2, 'Miles', 'Davis'), (3, NULL, 'Mingus');
    INSERT INTO music_album VALUES
        (1, 'Blue Train', 1957, 'jazz', 1),
        (2, 'Giant Steps', 1960, 'jazz', 1),
        (3, 'Kind of Blue', 1959, 'jazz', 2),
        (4, 'Bitches Brew', 1970, 'fusion', 2),
        (5, 'Mingus Ah Um', 1959, NULL, 3),
        (6, 'A Love Supreme', 1965, 'jazz', 1);
";

const ALBUMS: &str = "
    SELECT music_album.id AS id, title, year, genre,
           artist.first AS \"artist.first\", artist.last AS \"artist.last\"
    FROM music_album JOIN artist ON artist.id = music_album.artist_id
";

fn source() -> SqliteSource {
    let source = SqliteSource::open_in_memory().unwrap();
    source.connection().execute_batch(SCHEMA).unwrap();
    source
}

fn genres() -> Vec<Choice> {
    vec![
        Choice::new("jazz", "Jazz"),
        Choice::new("fusion", "Fusion"),
        Choice::new("null", "No genre"),
        Choice::new("not-null", "Any genre"),
    ]
}

fn albums<'a>(params: &'a RequestParams, source: &'a SqliteSource) -> Table<'a, &'a SqliteSource> {
    let entity = Entity::new("MusicAlbum").subquery(ALBUMS);
    let artist = Alias::new(
        "artist",
        Expr::concat([
            Expr::coalesce([Expr::attr("artist.first"), Expr::literal("")]),
            Expr::literal(" "),
            Expr::attr("artist.last"),
        ]),
    );
    let identifier = entity.search_identifier();
    Table::builder(entity.clone(), params)
        .label("Albums")
        .unit_label("album")
        .column(
            Column::linked("Title", "title", Endpoint::template("/albums/{id}"))
                .filter(SubstringFilter::new(&entity, "title", params)),
        )
        .column(Column::new("Year", "year").filter(EqualityFilter::new(
            &entity,
            "year",
            ValueType::Int,
            params,
        )))
        .column(Column::new("Artist", "artist.last").filter(SubstringAlias::new(&identifier, artist, params)))
        .column(Column::hidden("Genre", "genre"))
        .filter(ChoiceFilter::nullable("genre", genres(), params).with_default("all"))
        .filter(CombinedSubstringFilter::new(&entity, params))
        .source(source)
        .build()
        .unwrap()
}

fn titles(table: &Table<'_, &SqliteSource>) -> Vec<String> {
    table.rows().iter().map(|row| row[0].display()).collect()
}

#[test]
fn test_default_request() {
    let source = source();
    let params = RequestParams::new();
    let mut table = albums(&params, &source);
    table.select(0, 10).unwrap();

    // fallback ordering on the first visible column
    assert_eq!(
        titles(&table),
        vec!["Mingus Ah Um", "Kind of Blue", "Giant Steps", "Blue Train", "Bitches Brew", "A Love Supreme"]
    );
    assert_eq!(table.all_columns()[0].sort_direction(), Some(Direction::Desc));
    assert_eq!(table.rows()[0].len(), 3);
    assert_eq!(table.rows()[0][0].url(), Some("/albums/5"));
    assert_eq!(table.rows()[0][2].display(), "Mingus");
    assert_eq!(table.pager().count(), 6);
    assert_eq!(table.unit_label(), "album");
}

#[test]
fn test_choice_and_order() {
    let source = source();
    let params = RequestParams::parse("select.genre=jazz&order_by=year.asc");
    let mut table = albums(&params, &source);
    table.select(0, 2).unwrap();

    assert_eq!(titles(&table), vec!["Blue Train", "Kind of Blue"]);
    assert_eq!(table.count().unwrap(), 4);
    assert_eq!(table.pager().page_count(), 2);
    assert_eq!(table.all_columns()[0].sort_direction(), None);
    assert_eq!(table.all_columns()[1].sort_direction(), Some(Direction::Asc));
}

#[test]
fn test_null_choice() {
    let source = source();
    let params = RequestParams::parse("select.genre=null");
    let mut table = albums(&params, &source);
    table.select(0, 10).unwrap();
    assert_eq!(titles(&table), vec!["Mingus Ah Um"]);

    let params = RequestParams::parse("select.genre=not-null");
    let table = albums(&params, &source);
    assert_eq!(table.count().unwrap(), 5);
}

#[test]
fn test_invalid_choice_is_client_error() {
    let source = source();
    let params = RequestParams::parse("select.genre=polka");
    let mut table = albums(&params, &source);
    let err = table.select(0, 10).err().unwrap();
    assert!(err.is_client_error());
    assert!(matches!(err, Error::InvalidChoice(ref e) if e.param == "select.genre"));
}

#[test]
fn test_combined_search_by_alias() {
    let source = source();
    let params = RequestParams::parse("search_music_album.word=miles d&search_music_album.type=artist");
    let mut table = albums(&params, &source);
    table.select(0, 10).unwrap();
    assert_eq!(titles(&table), vec!["Kind of Blue", "Bitches Brew"]);
}

#[test]
fn test_combined_search_typed_equality() {
    let source = source();
    let params = RequestParams::parse("search_music_album.word=1959&search_music_album.type=year");
    let table = albums(&params, &source);
    assert_eq!(table.count().unwrap(), 2);

    let params = RequestParams::parse("search_music_album.word=abc&search_music_album.type=year");
    let table = albums(&params, &source);
    assert_eq!(table.count().unwrap(), 0);
}

#[test]
fn test_select_twice_is_stable() {
    let source = source();
    let params = RequestParams::parse("order_by=title.asc");
    let mut table = albums(&params, &source);
    table.select(0, 3).unwrap();
    let first = table.rows().to_vec();
    table.select(0, 3).unwrap();
    assert_eq!(table.rows(), first.as_slice());
}

#[test]
fn test_select_page_from_request() {
    let source = source();
    let params = RequestParams::parse("limit_music_album=4&offset_music_album=4&order_by=title.asc");
    let mut table = albums(&params, &source);
    table.select_page().unwrap();
    assert_eq!(titles(&table), vec!["Kind of Blue", "Mingus Ah Um"]);
    let pages: Vec<_> = table.pager().pages().iter().map(|p| (p.number, p.selected)).collect();
    assert_eq!(pages, vec![(1, false), (2, true)]);
}

#[test]
fn test_definition_end_to_end() {
    let json = r#"{
        "entity": "MusicAlbum",
        "table": "music_album",
        "columns": [
            { "label": "Title", "attribute": "title", "filters": [{ "kind": "substring" }] },
            { "label": "Year", "attribute": "year" }
        ],
        "filters": [
            { "kind": "choice", "attribute": "genre",
              "choices": [{ "name": "jazz", "description": "Jazz" }] },
            { "kind": "search", "column": "title" }
        ],
        "config": { "padding": 5 }
    }"#;
    let definition = TableDefinition::from_json(json).unwrap();
    let source = source();
    let params = RequestParams::parse(
        "select.genre=jazz&search_music_album.word=BLUE&search_music_album.type=title&order_by=title.asc",
    );
    let mut table = definition.build(&params, &source).unwrap();
    table.select(0, 10).unwrap();

    let titles: Vec<String> = table.rows().iter().map(|row| row[0].display()).collect();
    assert_eq!(titles, vec!["Blue Train", "Kind of Blue"]);
    assert_eq!(table.rows()[0][1].data(), &Value::Int(1957));
    assert_eq!(table.pager().padding(), 5);
}
