//! Session
//!
//! The interactive ordering loop. A session walks one customer (or a queue
//! of them) through picking a pizza, choosing box or slice, and entering a
//! quantity. Bad input repeats the current prompt; `q` backs out to the main
//! menu, or quits from the main menu itself. End of input ends the session.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    discounts::{OrderType, percent_points},
    kiosk::Kiosk,
    menu::{MenuError, MenuItem, MenuWriteError},
    orders::{OrderRecord, OrderTimestamp},
    pricing::{self, PricingError},
    recorder::OrderRecorder,
};

const RULE_WIDTH: usize = 40;

const ORDER_TYPE_PROMPT: &str = "Select 'B' for Box or 'S' for Slice (or 'q' to cancel): ";

/// Errors that end a session early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Terminal input or output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The menu could not be shown.
    #[error(transparent)]
    MenuWrite(#[from] MenuWriteError),

    /// A price could not be derived.
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// An order could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Where the customer is in the ordering flow.
#[derive(Debug, Clone, Copy)]
enum State<'k> {
    MainMenu,
    PizzaSelected(&'k MenuItem),
    AwaitingOrderType(&'k MenuItem),
    AwaitingQuantity(&'k MenuItem, OrderType),
    Exit,
}

/// What the customer typed at a prompt.
enum Reply {
    Line(String),
    EndOfInput,
}

/// An interactive ordering session over a pair of text streams.
#[derive(Debug)]
pub struct Session<'k, I, O, R> {
    kiosk: &'k Kiosk,
    input: I,
    output: O,
    recorder: R,
    orders_recorded: usize,
}

impl<'k, I, O, R> Session<'k, I, O, R>
where
    I: BufRead,
    O: Write,
    R: OrderRecorder,
{
    /// Create a new session.
    pub fn new(kiosk: &'k Kiosk, input: I, output: O, recorder: R) -> Self {
        Self {
            kiosk,
            input,
            output,
            recorder,
            orders_recorded: 0,
        }
    }

    /// Consume the session, returning the order sink.
    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// Run until the customer quits or input ends.
    ///
    /// Returns the number of orders saved to the recorder. Orders that were
    /// priced but could not be saved are not counted.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written, or an
    /// order cannot be priced. Failing to save an order is not an error; it
    /// is logged and reported on screen.
    pub fn run(&mut self) -> Result<usize, SessionError> {
        self.write_banner()?;

        let mut state = State::MainMenu;

        loop {
            debug!(?state, "session state");

            state = match state {
                State::MainMenu => self.main_menu()?,
                State::PizzaSelected(item) => self.pizza_selected(item)?,
                State::AwaitingOrderType(item) => self.order_type(item)?,
                State::AwaitingQuantity(item, order_type) => self.quantity(item, order_type)?,
                State::Exit => break,
            };
        }

        Ok(self.orders_recorded)
    }

    fn write_banner(&mut self) -> Result<(), SessionError> {
        let rule = "=".repeat(RULE_WIDTH);
        let bonus = percent_points(self.kiosk.policy().featured_bonus());

        writeln!(self.output, "\n{rule}")?;
        writeln!(self.output, "🍕 Welcome to RushMore Pizzeria 🍕")?;
        writeln!(
            self.output,
            "👉 Today's Pizza of the Day: {} ({bonus}% off!)",
            self.kiosk.pizza_of_the_day().name()
        )?;
        writeln!(self.output, "{rule}")?;

        Ok(())
    }

    fn main_menu(&mut self) -> Result<State<'k>, SessionError> {
        let kiosk = self.kiosk;

        writeln!(self.output, "\nHere is our menu:")?;
        kiosk
            .menu()
            .write_to(&mut self.output, Some(kiosk.pizza_of_the_day().id()))?;

        let prompt = format!(
            "\nPick your choice (1-{}) or 'q' to quit: ",
            kiosk.menu().len()
        );

        let Reply::Line(choice) = self.prompt(&prompt)? else {
            return Ok(State::Exit);
        };

        if choice.eq_ignore_ascii_case("q") {
            writeln!(
                self.output,
                "Thank you for visiting RushMore! Come again soon."
            )?;

            return Ok(State::Exit);
        }

        match kiosk.menu().lookup(&choice) {
            Ok(item) => Ok(State::PizzaSelected(item)),
            Err(error) => {
                debug!(%error, "menu choice rejected");
                writeln!(self.output, "Invalid input. Please try again.")?;

                Ok(State::MainMenu)
            }
        }
    }

    fn pizza_selected(&mut self, item: &'k MenuItem) -> Result<State<'k>, SessionError> {
        writeln!(self.output, "\nYou selected {} Pizza", item.name())?;
        writeln!(
            self.output,
            "Price - {} per box | {} per slice",
            item.box_price(),
            item.slice_price()?
        )?;

        if self.kiosk.is_pizza_of_the_day(item) {
            let bonus = percent_points(self.kiosk.policy().featured_bonus());

            writeln!(
                self.output,
                "*** Pizza of the Day! Enjoy an extra {bonus}% discount! ***"
            )?;
        }

        Ok(State::AwaitingOrderType(item))
    }

    fn order_type(&mut self, item: &'k MenuItem) -> Result<State<'k>, SessionError> {
        let Reply::Line(choice) = self.prompt(ORDER_TYPE_PROMPT)? else {
            return Ok(State::Exit);
        };

        match choice.to_ascii_uppercase().as_str() {
            "B" => Ok(State::AwaitingQuantity(item, OrderType::Box)),
            "S" => Ok(State::AwaitingQuantity(item, OrderType::Slice)),
            "Q" => {
                writeln!(self.output, "Order Cancelled!")?;

                Ok(State::MainMenu)
            }
            _ => {
                writeln!(self.output, "Select either B, S or Q")?;

                Ok(State::AwaitingOrderType(item))
            }
        }
    }

    fn quantity(
        &mut self,
        item: &'k MenuItem,
        order_type: OrderType,
    ) -> Result<State<'k>, SessionError> {
        let prompt = match order_type {
            OrderType::Box => "How many Box(es) do you want? (or type 'q' to cancel): ",
            OrderType::Slice => "How many slices do you want? (or type 'q' to cancel): ",
        };

        let Reply::Line(reply) = self.prompt(prompt)? else {
            return Ok(State::Exit);
        };

        if reply.eq_ignore_ascii_case("q") {
            writeln!(self.output, "{order_type} Order Cancelled")?;

            return Ok(State::MainMenu);
        }

        match self.kiosk.policy().validate_quantity(order_type, &reply) {
            Ok(quantity) => {
                self.complete_order(item, order_type, quantity)?;

                Ok(State::MainMenu)
            }
            Err(error) => {
                writeln!(self.output, "{error}")?;

                Ok(State::AwaitingQuantity(item, order_type))
            }
        }
    }

    fn complete_order(
        &mut self,
        item: &MenuItem,
        order_type: OrderType,
        quantity: u32,
    ) -> Result<(), SessionError> {
        let policy = self.kiosk.policy();
        let featured = self.kiosk.is_pizza_of_the_day(item);
        let discount = policy.discount_for(order_type, quantity, featured);

        let (unit_price, unit_label) = match order_type {
            OrderType::Box => (item.box_price(), "box(es)"),
            OrderType::Slice => (item.slice_price()?, "slice(s)"),
        };

        let total = pricing::total(unit_price, quantity, discount.rate())?;

        writeln!(
            self.output,
            "Your payment is {} for {quantity} {unit_label} of {}.",
            total.rounded()?,
            item.name()
        )?;

        if discount.is_applied() {
            writeln!(
                self.output,
                "Discount applied: {}%",
                discount.percent_points()
            )?;
        }

        info!(
            pizza = item.name(),
            %order_type,
            quantity,
            total = %total.amount(),
            discount = %discount.fraction(),
            "order placed"
        );

        let record = OrderRecord::new(
            OrderTimestamp::now(),
            item.name(),
            order_type,
            quantity,
            total.amount(),
            discount.is_applied(),
        );

        match self.recorder.record(record) {
            Ok(()) => self.orders_recorded += 1,
            Err(error) => {
                error!(%error, "failed to save order");

                writeln!(
                    self.output,
                    "Sorry, we could not save your order to the order log."
                )?;
            }
        }

        Ok(())
    }

    fn prompt(&mut self, prompt: &str) -> Result<Reply, SessionError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = Vec::new();

        if self.input.read_until(b'\n', &mut line)? == 0 {
            writeln!(self.output)?;

            return Ok(Reply::EndOfInput);
        }

        // Undecodable bytes become U+FFFD, which no prompt accepts.
        let line = String::from_utf8_lossy(&line);

        Ok(Reply::Line(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::{discounts::DiscountPolicy, menu::Menu};

    /// Pepperoni (3) is never featured in these tests; Greek (9) always is.
    fn kiosk() -> Result<Kiosk, MenuError> {
        Kiosk::new(Menu::rushmore()?, DiscountPolicy::default(), "9")
    }

    type Outcome = (String, Vec<OrderRecord>, usize);

    fn run(kiosk: &Kiosk, input: impl AsRef<[u8]>) -> Result<Outcome, SessionError> {
        let mut output = Vec::new();
        let mut session = Session::new(kiosk, Cursor::new(input), &mut output, Vec::new());

        let recorded = session.run()?;
        let records = session.into_recorder();
        let text = String::from_utf8_lossy(&output).into_owned();

        Ok((text, records, recorded))
    }

    #[test]
    fn banner_announces_pizza_of_the_day() -> TestResult {
        let (output, _, _) = run(&kiosk()?, "q\n")?;

        assert!(output.contains("Welcome to RushMore Pizzeria"));
        assert!(output.contains("Today's Pizza of the Day: Greek (25% off!)"));
        assert!(output.contains("Thank you for visiting RushMore! Come again soon."));

        Ok(())
    }

    #[test]
    fn box_order_is_priced_and_recorded() -> TestResult {
        let (output, records, recorded) = run(&kiosk()?, "3\nb\n10\nq\n")?;

        assert!(output.contains("You selected Pepperoni Pizza"));
        assert!(output.contains("Price - $4.00 per box | $0.50 per slice"));
        assert!(output.contains("Your payment is $32.00 for 10 box(es) of Pepperoni."));
        assert!(output.contains("Discount applied: 20%"));
        assert_eq!(recorded, 1);

        let [record] = records.as_slice() else {
            return Err("expected exactly one record".into());
        };

        assert_eq!(record.pizza_name(), "Pepperoni");
        assert_eq!(record.order_type(), OrderType::Box);
        assert_eq!(record.quantity(), 10);
        assert_eq!(record.total_price(), Decimal::from(32));
        assert!(record.discount_applied());

        Ok(())
    }

    #[test]
    fn featured_slice_order_combines_discounts() -> TestResult {
        let (output, records, _) = run(&kiosk()?, "9\nS\n8\nq\n")?;

        assert!(output.contains("*** Pizza of the Day! Enjoy an extra 25% discount! ***"));
        assert!(output.contains("Your payment is $5.60 for 8 slice(s) of Greek."));
        assert!(output.contains("Discount applied: 30%"));

        let [record] = records.as_slice() else {
            return Err("expected exactly one record".into());
        };

        assert_eq!(record.order_type(), OrderType::Slice);
        assert_eq!(record.total_price(), Decimal::new(56, 1));

        Ok(())
    }

    #[test]
    fn undiscounted_order_does_not_mention_discount() -> TestResult {
        let (output, records, _) = run(&kiosk()?, "1\nb\n2\nq\n")?;

        assert!(output.contains("Your payment is $6.80 for 2 box(es) of Classic."));
        assert!(!output.contains("Discount applied"));
        assert!(records.iter().all(|record| !record.discount_applied()));

        Ok(())
    }

    #[test]
    fn too_many_slices_repeats_the_prompt() -> TestResult {
        let (output, records, _) = run(&kiosk()?, "3\ns\n17\n16\nq\n")?;

        assert!(output.contains("Maximum of 16 slices per order. Please try again."));
        assert_eq!(records.len(), 1);
        assert_eq!(records.first().map(OrderRecord::quantity), Some(16));

        Ok(())
    }

    #[test]
    fn non_numeric_quantity_repeats_the_prompt() -> TestResult {
        let (output, records, _) = run(&kiosk()?, "3\nb\nlots\n0\n2\nq\n")?;

        assert!(output.contains("Please enter a valid number."));
        assert!(output.contains("Please order at least one."));
        assert_eq!(records.len(), 1);

        Ok(())
    }

    #[test]
    fn cancelling_quantity_records_nothing() -> TestResult {
        let (output, records, recorded) = run(&kiosk()?, "3\nb\nq\nq\n")?;

        assert!(output.contains("Box Order Cancelled"));
        assert!(records.is_empty());
        assert_eq!(recorded, 0);

        // Back at the main menu: shown once at start and once after cancelling.
        assert_eq!(output.matches("Here is our menu:").count(), 2);

        Ok(())
    }

    #[test]
    fn cancelling_slice_quantity_names_slice_order() -> TestResult {
        let (output, records, _) = run(&kiosk()?, "3\ns\nQ\nq\n")?;

        assert!(output.contains("Slice Order Cancelled"));
        assert!(records.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_order_type_repeats_the_prompt() -> TestResult {
        let (output, records, _) = run(&kiosk()?, "3\nx\nq\nq\n")?;

        assert!(output.contains("Select either B, S or Q"));
        assert!(output.contains("Order Cancelled!"));
        assert!(records.is_empty());

        Ok(())
    }

    #[test]
    fn unknown_pizza_returns_to_main_menu() -> TestResult {
        let (output, records, _) = run(&kiosk()?, "12\nq\n")?;

        assert!(output.contains("Invalid input. Please try again."));
        assert!(records.is_empty());
        assert_eq!(output.matches("Here is our menu:").count(), 2);

        Ok(())
    }

    #[test]
    fn end_of_input_ends_the_session() -> TestResult {
        let (_, records, recorded) = run(&kiosk()?, "3\nb\n")?;

        assert!(records.is_empty());
        assert_eq!(recorded, 0);

        Ok(())
    }

    #[test]
    fn several_orders_in_one_session() -> TestResult {
        let (_, records, recorded) = run(&kiosk()?, "3\nb\n1\n9\ns\n2\nQ\n")?;

        let names: Vec<&str> = records.iter().map(OrderRecord::pizza_name).collect();

        assert_eq!(names, ["Pepperoni", "Greek"]);
        assert_eq!(recorded, 2);

        Ok(())
    }

    #[test]
    fn undecodable_quantity_repeats_the_prompt() -> TestResult {
        let (output, records, recorded) = run(&kiosk()?, b"3\nb\n\xff\xfe\n2\nq\n")?;

        assert!(output.contains("Please enter a valid number."));
        assert_eq!(recorded, 1);
        assert_eq!(records.first().map(OrderRecord::quantity), Some(2));

        Ok(())
    }

    #[test]
    fn undecodable_input_is_rejected_at_every_prompt() -> TestResult {
        let (output, records, _) = run(&kiosk()?, b"\xff\n3\n\xc3\nb\n1\nq\n")?;

        assert!(output.contains("Invalid input. Please try again."));
        assert!(output.contains("Select either B, S or Q"));
        assert_eq!(records.len(), 1);

        Ok(())
    }

    #[derive(Debug)]
    struct BrokenRecorder;

    impl OrderRecorder for BrokenRecorder {
        fn record(&mut self, _record: OrderRecord) -> Result<(), crate::recorder::RecorderError> {
            Err(crate::recorder::RecorderError::Write {
                path: "orders.json".into(),
                source: io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn failed_save_is_reported_and_session_continues() -> TestResult {
        let kiosk = kiosk()?;
        let mut output = Vec::new();
        let input = Cursor::new("3\nb\n1\nq\n");
        let mut session = Session::new(&kiosk, input, &mut output, BrokenRecorder);

        let recorded = session.run()?;
        let output = String::from_utf8_lossy(&output).into_owned();

        assert_eq!(recorded, 0);
        assert!(output.contains("Your payment is $4.00 for 1 box(es) of Pepperoni."));
        assert!(output.contains("Sorry, we could not save your order to the order log."));
        assert!(output.contains("Thank you for visiting RushMore!"));

        Ok(())
    }
}
