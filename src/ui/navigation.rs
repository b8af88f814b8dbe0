use chrono::{Datelike, Days, Months, NaiveDate};

use crate::calendar::CalendarView;

/// Visible date span of a view, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Which view is active and which date it is centered on. Weeks start on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCursor {
    pub view: CalendarView,
    pub focus_date: NaiveDate,
}

impl ViewCursor {
    pub fn new(view: CalendarView, focus_date: NaiveDate) -> Self {
        Self { view, focus_date }
    }

    pub fn change_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    pub fn prev(&mut self) {
        self.focus_date = match self.view {
            CalendarView::DayGridMonth => first_of_month(self.focus_date)
                .checked_sub_months(Months::new(1)),
            CalendarView::TimeGridWeek => self.focus_date.checked_sub_days(Days::new(7)),
            CalendarView::TimeGridDay => self.focus_date.pred_opt(),
        }
        .unwrap_or(self.focus_date);
    }

    pub fn next(&mut self) {
        self.focus_date = match self.view {
            CalendarView::DayGridMonth => first_of_month(self.focus_date)
                .checked_add_months(Months::new(1)),
            CalendarView::TimeGridWeek => self.focus_date.checked_add_days(Days::new(7)),
            CalendarView::TimeGridDay => self.focus_date.succ_opt(),
        }
        .unwrap_or(self.focus_date);
    }

    pub fn today(&mut self, today: NaiveDate) {
        self.focus_date = today;
    }

    pub fn visible_range(&self) -> DateRange {
        match self.view {
            CalendarView::DayGridMonth => {
                let start = first_of_month(self.focus_date);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|d| d.pred_opt())
                    .unwrap_or(start);
                DateRange { start, end }
            }
            CalendarView::TimeGridWeek => {
                let start = week_start(self.focus_date);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                DateRange { start, end }
            }
            CalendarView::TimeGridDay => DateRange {
                start: self.focus_date,
                end: self.focus_date,
            },
        }
    }

    /// Whether the "Today" button should be highlighted.
    pub fn is_today_active(&self, today: NaiveDate) -> bool {
        self.visible_range().contains(today)
    }

    pub fn title(&self) -> String {
        match self.view {
            CalendarView::DayGridMonth => self.focus_date.format("%B %Y").to_string(),
            CalendarView::TimeGridDay => self.focus_date.format("%B %-d, %Y").to_string(),
            CalendarView::TimeGridWeek => {
                let DateRange { start, end } = self.visible_range();
                if start.year() != end.year() {
                    format!("{} – {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
                } else if start.month() != end.month() {
                    format!("{} – {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
                } else {
                    format!("{} – {}", start.format("%b %-d"), end.format("%-d, %Y"))
                }
            }
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(days_from_sunday)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn month_range_covers_whole_month() {
        let cursor = ViewCursor::new(CalendarView::DayGridMonth, date(2024, 2, 14));

        let range = cursor.visible_range();

        assert_eq!(range, DateRange { start: date(2024, 2, 1), end: date(2024, 2, 29) });
    }

    #[test]
    fn week_range_starts_on_sunday() {
        let cursor = ViewCursor::new(CalendarView::TimeGridWeek, date(2024, 6, 5));

        let range = cursor.visible_range();

        assert_eq!(range, DateRange { start: date(2024, 6, 2), end: date(2024, 6, 8) });
    }

    #[test]
    fn titles_follow_view() {
        let focus = date(2024, 6, 1);

        assert_eq!(ViewCursor::new(CalendarView::DayGridMonth, focus).title(), "June 2024");
        assert_eq!(ViewCursor::new(CalendarView::TimeGridDay, focus).title(), "June 1, 2024");
        assert_eq!(ViewCursor::new(CalendarView::TimeGridWeek, date(2024, 6, 4)).title(), "Jun 2 – 8, 2024");
    }

    #[test]
    fn week_title_spanning_months_and_years() {
        let across_months = ViewCursor::new(CalendarView::TimeGridWeek, date(2024, 7, 2));
        let across_years = ViewCursor::new(CalendarView::TimeGridWeek, date(2024, 12, 31));

        assert_eq!(across_months.title(), "Jun 30 – Jul 6, 2024");
        assert_eq!(across_years.title(), "Dec 29, 2024 – Jan 4, 2025");
    }

    #[test]
    fn month_navigation_clamps_to_month_start() {
        let mut cursor = ViewCursor::new(CalendarView::DayGridMonth, date(2024, 3, 31));

        cursor.prev();
        assert_eq!(cursor.focus_date, date(2024, 2, 1));

        cursor.next();
        cursor.next();
        assert_eq!(cursor.focus_date, date(2024, 4, 1));
    }

    #[test]
    fn week_and_day_navigation_step_by_period() {
        let mut cursor = ViewCursor::new(CalendarView::TimeGridWeek, date(2024, 6, 5));
        cursor.next();
        assert_eq!(cursor.focus_date, date(2024, 6, 12));

        cursor.change_view(CalendarView::TimeGridDay);
        cursor.prev();
        assert_eq!(cursor.focus_date, date(2024, 6, 11));
    }

    #[test]
    fn today_button_active_only_when_today_visible() {
        let today = date(2024, 6, 15);
        let mut cursor = ViewCursor::new(CalendarView::DayGridMonth, date(2024, 6, 1));
        assert!(cursor.is_today_active(today));

        cursor.next();
        assert!(!cursor.is_today_active(today));

        cursor.today(today);
        assert!(cursor.is_today_active(today));
    }
}
